/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::{info, warn};
use std::thread::{Builder, JoinHandle};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::config::{BuildingConfig, ElevatorConfig};
use crate::dispatch::controller::{Command, DispatchController};
use crate::elevator::ElevatorUnit;
use crate::shared::{DispatchError, FleetEvent, FleetState, TargetUpdate, UnitEvent};

// Observers that fall further behind than this start losing events
const FLEET_EVENT_CAPACITY: usize = 1024;

/**
 * Handle to a running simulation.
 *
 * `start` creates the fleet, spawns one thread per elevator unit and one for
 * the dispatch controller, and wires them together:
 *
 * - units -> controller:       `UnitEvent` (shared channel)
 * - controller -> unit i:      `TargetUpdate` (one channel per unit)
 * - handle -> controller:      `Command`
 * - controller -> observers:   `FleetEvent`
 *
 * Dropping the handle without `shutdown` still stops every thread, since the
 * controller exits once its command channel disconnects.
 */
pub struct Dispatcher {
    n_floors: u8,
    command_tx: cbc::Sender<Command>,
    fleet_event_rx: cbc::Receiver<FleetEvent>,
    threads: Vec<JoinHandle<()>>,
}

impl Dispatcher {
    pub fn start(building: &BuildingConfig, elevator: &ElevatorConfig) -> std::io::Result<Dispatcher> {
        let fleet = FleetState::new(building.n_floors, building.n_elevators);

        let (command_tx, command_rx) = cbc::unbounded::<Command>();
        let (unit_event_tx, unit_event_rx) = cbc::unbounded::<UnitEvent>();
        let (fleet_event_tx, fleet_event_rx) = cbc::bounded::<FleetEvent>(FLEET_EVENT_CAPACITY);

        let mut threads = Vec::with_capacity(building.n_elevators + 1);
        let mut unit_target_txs = Vec::with_capacity(building.n_elevators);

        // Start the elevator units
        for id in 0..building.n_elevators {
            let (target_tx, target_rx) = cbc::unbounded::<TargetUpdate>();
            unit_target_txs.push(target_tx);

            let unit = ElevatorUnit::new(id, elevator, target_rx, unit_event_tx.clone());
            let unit_thread = Builder::new().name(format!("elevator_{}", id));
            threads.push(unit_thread.spawn(move || unit.run())?);
        }
        drop(unit_event_tx);

        // Start the dispatch controller
        let controller = DispatchController::new(
            fleet,
            command_rx,
            unit_event_rx,
            unit_target_txs,
            fleet_event_tx,
        );
        let controller_thread = Builder::new().name("dispatch_controller".into());
        threads.push(controller_thread.spawn(move || controller.run())?);

        info!(
            "Simulation started with {} elevators over {} floors, tick {} ms",
            building.n_elevators, building.n_floors, elevator.tick_ms
        );

        Ok(Dispatcher {
            n_floors: building.n_floors,
            command_tx,
            fleet_event_rx,
            threads,
        })
    }

    /// Requests an elevator to `floor`. Whether and where the call was
    /// assigned is reported on the `events` channel.
    pub fn call_elevator(&self, floor: u8) -> Result<(), DispatchError> {
        if floor >= self.n_floors {
            return Err(DispatchError::InvalidFloor {
                floor,
                floors: self.n_floors,
            });
        }
        self.command_tx
            .send(Command::Call(floor))
            .map_err(|_| DispatchError::Disconnected)
    }

    pub fn snapshot(&self) -> Result<FleetState, DispatchError> {
        let (reply_tx, reply_rx) = cbc::bounded::<FleetState>(1);
        self.command_tx
            .send(Command::Snapshot(reply_tx))
            .map_err(|_| DispatchError::Disconnected)?;
        reply_rx.recv().map_err(|_| DispatchError::Disconnected)
    }

    pub fn events(&self) -> cbc::Receiver<FleetEvent> {
        self.fleet_event_rx.clone()
    }

    pub fn shutdown(self) {
        let _ = self.command_tx.send(Command::Terminate);
        for thread in self.threads {
            let name = thread.thread().name().unwrap_or("unnamed").to_string();
            if thread.join().is_err() {
                warn!("Thread {} panicked", name);
            }
        }
    }
}
