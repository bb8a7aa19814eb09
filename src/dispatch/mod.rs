pub mod assigner;
pub mod controller;
pub mod handle;

pub use controller::DispatchController;
pub use handle::Dispatcher;
