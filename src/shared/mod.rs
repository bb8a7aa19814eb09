pub mod error;
pub mod macros;
pub mod structs;

pub use error::DispatchError;
pub use structs::Direction;
pub use structs::ElevatorState;
pub use structs::FleetEvent;
pub use structs::FleetState;
pub use structs::TargetUpdate;
pub use structs::UnitEvent;
