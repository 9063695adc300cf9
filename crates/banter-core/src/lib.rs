pub mod api;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod runtime;
pub mod sync;

pub use api::{ApiClient, Gateway};
pub use config::{ClientConfig, SyncConfig};
pub use error::{ApiError, SendError, SyncError};
pub use runtime::Messenger;
