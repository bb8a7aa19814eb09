//! Elevator dispatch simulator.
//!
//! A fixed fleet of elevators serves a building with a fixed number of
//! floors. Each elevator runs its own motion thread, and a single dispatch
//! controller owns the fleet state, assigns calls and applies the reports of
//! the units. See [`dispatch::Dispatcher`] for the entry point.

/* Modules */
pub mod config;
pub mod console;
pub mod dispatch;
pub mod elevator;
pub mod shared;

pub use dispatch::Dispatcher;
pub use shared::{Direction, DispatchError, ElevatorState, FleetEvent, FleetState};
