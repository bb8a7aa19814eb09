/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::warn;
use std::fmt::Write;
use std::thread::sleep;
use std::time::Duration;
use thiserror::Error;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::dispatch::Dispatcher;
use crate::shared::{DispatchError, FleetEvent, FleetState};

/*
 * Terminal front end.
 *
 * Stands in for a graphical building view: one row per floor with the top
 * floor first, each row listing the elevators that stand on it.
 */

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    Call(u8),
    Status,
    Json,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}', type 'help' for a list of commands")]
    Unknown(String),
    #[error("'call' needs a floor number")]
    MissingFloor,
    #[error("'{0}' is not a floor number")]
    BadFloor(String),
}

pub const HELP: &str = "\
commands:
  call <floor>   request an elevator to <floor>
  status         show the building
  json           show the fleet as JSON
  help           show this text
  quit           stop the simulation";

/***************************************/
/*             Public API              */
/***************************************/

/// Parses one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<ConsoleCommand>, CommandError> {
    let mut words = line.split_whitespace();
    let Some(word) = words.next() else {
        return Ok(None);
    };

    let command = match word.to_lowercase().as_str() {
        "call" | "c" => {
            let floor = words.next().ok_or(CommandError::MissingFloor)?;
            let floor = floor
                .parse::<u8>()
                .map_err(|_| CommandError::BadFloor(floor.to_string()))?;
            ConsoleCommand::Call(floor)
        }
        "status" | "s" => ConsoleCommand::Status,
        "json" => ConsoleCommand::Json,
        "help" | "h" | "?" => ConsoleCommand::Help,
        "quit" | "q" | "exit" => ConsoleCommand::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

pub fn render_building(fleet: &FleetState) -> String {
    let width = fleet.n_floors.saturating_sub(1).to_string().len();
    let mut out = String::new();

    for floor in (0..fleet.n_floors).rev() {
        let _ = write!(out, "floor {:>width$} |", floor, width = width);
        for elevator in fleet.elevators.iter().filter(|e| e.current_floor == floor) {
            let _ = write!(out, " [E{} {}", elevator.id, elevator.direction.symbol());
            for target in &elevator.target_floors {
                let _ = write!(out, " {}", target);
            }
            out.push(']');
        }
        out.push('\n');
    }
    out
}

pub fn fleet_json(fleet: &FleetState) -> serde_json::Result<String> {
    serde_json::to_string_pretty(fleet)
}

/// Issues `calls` in order and polls every `poll` until the fleet is idle.
/// Calls to floors outside the building are skipped with a warning.
pub fn run_scripted(
    dispatcher: &Dispatcher,
    calls: &[u8],
    poll: Duration,
) -> Result<FleetState, DispatchError> {
    for &floor in calls {
        match dispatcher.call_elevator(floor) {
            Ok(()) => {}
            Err(e @ DispatchError::InvalidFloor { .. }) => warn!("{}", e),
            Err(e) => return Err(e),
        }
    }

    // Dropped calls never show up in a queue, so idle means done
    loop {
        let fleet = dispatcher.snapshot()?;
        if fleet.all_idle() {
            return Ok(fleet);
        }
        sleep(poll);
    }
}

pub fn describe_event(event: &FleetEvent) -> String {
    match *event {
        FleetEvent::Assigned { floor, id } => {
            format!("call to floor {} assigned to elevator {}", floor, id)
        }
        FleetEvent::Dropped { floor } => {
            format!("no elevator can take the call to floor {}", floor)
        }
        FleetEvent::Rejected { floor } => format!("floor {} does not exist", floor),
        FleetEvent::Moved {
            id,
            floor,
            direction,
        } => format!("elevator {} is on floor {} ({})", id, floor, direction),
        FleetEvent::Arrived { id, floor } => format!("elevator {} arrived at floor {}", id, floor),
    }
}

/***************************************/
/*             Unit tests              */
/***************************************/
