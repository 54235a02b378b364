mod client_sink;
mod signaling_relay;

pub use client_sink::ClientSink;
pub use signaling_relay::SignalingRelay;
