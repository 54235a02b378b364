mod signaling_service;
mod ws_handler;

pub use signaling_service::SignalingService;
pub use ws_handler::{AppState, ws_handler};
