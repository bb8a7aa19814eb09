/***************************************/
/*        3rd party libraries          */
/***************************************/
use thiserror::Error;

/***************************************/
/*            Public errors            */
/***************************************/
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("floor {floor} is outside the building (valid floors are 0..{floors})")]
    InvalidFloor { floor: u8, floors: u8 },
    #[error("dispatch controller is no longer running")]
    Disconnected,
}
