mod member;
mod peer;
mod room;
mod signaling;

pub use member::{CapabilityPatch, Member, MemberInfo, now_millis};
pub use peer::PeerId;
pub use room::RoomId;
pub use signaling::{ClientEvent, IceCandidateInit, SdpKind, ServerEvent, SessionDescription};
