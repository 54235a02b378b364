mod routes;

pub use routes::{describe_room, room_exists};
