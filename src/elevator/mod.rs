pub mod unit;
pub mod unit_tests;

pub use unit::ElevatorUnit;
