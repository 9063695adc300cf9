pub mod conversation;
pub mod message;
pub mod notification;
pub mod user;

pub use conversation::Conversation;
pub use message::{Attachment, Draft, Message, PendingSend};
pub use notification::Notification;
pub use user::User;

/// Anything the merge engine can hold: identified by an immutable id
/// and ordered by a server-assigned timestamp (seconds resolution,
/// ties possible).
pub trait Record {
    fn record_id(&self) -> &str;
    fn created_at(&self) -> u64;
}
