pub mod directory;
pub mod merge;
pub mod notifications;
pub mod preview;
pub mod scheduler;
pub mod stream;
pub mod window;

pub use directory::ConversationDirectory;
pub use notifications::NotificationFeed;
pub use preview::PreviewCache;
pub use scheduler::SyncScheduler;
pub use stream::{TickGate, TickOutcome};
pub use window::{MessageWindow, WindowSnapshot};
