use serde::Deserialize;

/// A conversation row as served by the backend.
///
/// The directory replaces the whole list on every refresh; there is
/// no partial-update contract, so no patch logic lives here.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    pub name: String,
    pub updated_at: u64,
    #[serde(default)]
    pub member_count: u32,
}
