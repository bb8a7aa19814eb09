/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use serde::Serialize;
use std::fmt;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Down,
    Idle,
    Up,
}

impl Direction {
    pub fn symbol(self) -> char {
        match self {
            Direction::Down => 'v',
            Direction::Idle => '-',
            Direction::Up => '^',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Down => write!(f, "down"),
            Direction::Idle => write!(f, "idle"),
            Direction::Up => write!(f, "up"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ElevatorState {
    pub id: usize,
    #[serde(rename = "currentFloor")]
    pub current_floor: u8,
    #[serde(rename = "targetFloors")]
    pub target_floors: Vec<u8>,
    pub direction: Direction,
}

impl ElevatorState {
    pub fn new(id: usize) -> ElevatorState {
        ElevatorState {
            id,
            current_floor: 0,
            target_floors: Vec::new(),
            direction: Direction::Idle,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.target_floors.is_empty()
    }
}

/// Authoritative state of the whole fleet.
///
/// The registry is created once with every elevator idle at floor 0 and is
/// never resized: `elevators[i].id == i` for the lifetime of the process.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FleetState {
    #[serde(rename = "floors")]
    pub n_floors: u8,
    pub elevators: Vec<ElevatorState>,
}

impl FleetState {
    pub fn new(n_floors: u8, n_elevators: usize) -> FleetState {
        FleetState {
            n_floors,
            elevators: (0..n_elevators).map(ElevatorState::new).collect(),
        }
    }

    pub fn get(&self, id: usize) -> Option<&ElevatorState> {
        self.elevators.get(id)
    }

    pub fn all_idle(&self) -> bool {
        self.elevators.iter().all(ElevatorState::is_idle)
    }
}

/***************************************/
/*              Messages               */
/***************************************/

/// Notification sent from an elevator unit to the dispatch controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitEvent {
    Move {
        id: usize,
        floor: u8,
        direction: Direction,
    },
    Arrive {
        id: usize,
        floor: u8,
    },
}

/// Target queue pushed from the dispatch controller to one elevator unit.
///
/// `ack` is set when the update answers a notification from that unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetUpdate {
    pub targets: Vec<u8>,
    pub ack: bool,
}

/// Observable fleet activity, for rendering and animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FleetEvent {
    Assigned { floor: u8, id: usize },
    Dropped { floor: u8 },
    Rejected { floor: u8 },
    Moved { id: usize, floor: u8, direction: Direction },
    Arrived { id: usize, floor: u8 },
}
