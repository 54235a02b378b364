mod command;
mod coordinator;
mod handle;

pub use command::{Command, RoomSnapshot, SessionSnapshot};
pub use coordinator::SessionCoordinator;
pub use handle::CoordinatorHandle;
