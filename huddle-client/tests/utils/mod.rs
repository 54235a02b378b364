pub mod mock_transport;

pub use mock_rtc::*;
pub use mock_transport::*;
