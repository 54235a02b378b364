mod room;
mod room_registry;

pub use room::{Room, RoomInfo};
pub use room_registry::RoomRegistry;
