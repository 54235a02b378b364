mod config;
pub mod http;
pub mod registry;
pub mod relay;
pub mod signaling;

pub use config::ServerConfig;
pub use registry::{RoomInfo, RoomRegistry};
pub use relay::{ClientSink, SignalingRelay};
pub use signaling::{AppState, SignalingService, ws_handler};
