use std::future::Future;

use crate::error::ApiError;
use crate::models::{Conversation, Draft, Message, Notification, User};

/// The fetch primitive the synchronization engine is built over.
///
/// Plain request/response, no push channel. The engine assumes each
/// page is internally sorted oldest-first and never issues more than
/// one call per stream at a time; everything else (merging, ordering,
/// cancellation) is the engine's problem, which is what makes the
/// transport swappable without touching the merge or window contracts.
///
/// Futures are declared `Send` so components can be driven from
/// spawned tasks.
pub trait Gateway: Send + Sync + 'static {
    /// `GET conversations`: full list, treated as unordered.
    fn conversations(&self) -> impl Future<Output = Result<Vec<Conversation>, ApiError>> + Send;

    /// `GET messages?skip={n}&conv_id={id}`: one page, oldest-first
    /// within the page. `skip` counts from the most recent end;
    /// skip 0 is the most recent page.
    fn messages(
        &self,
        conversation_id: &str,
        skip: usize,
    ) -> impl Future<Output = Result<Vec<Message>, ApiError>> + Send;

    /// `GET message/last?conv_id={id}`: most recent message, if any.
    fn last_message(
        &self,
        conversation_id: &str,
    ) -> impl Future<Output = Result<Option<Message>, ApiError>> + Send;

    /// `GET conversation/users?convId={id}`: current member list.
    fn members(
        &self,
        conversation_id: &str,
    ) -> impl Future<Output = Result<Vec<User>, ApiError>> + Send;

    /// `POST message?conv_id={id}`: multipart `{text, attachment?}`.
    /// Only success/failure matters to the client; the canonical
    /// record is picked up by the next forward poll.
    fn send_message(
        &self,
        conversation_id: &str,
        draft: &Draft,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// `GET noti?skip={n}`: notification page, same shape as messages.
    fn notifications(
        &self,
        skip: usize,
    ) -> impl Future<Output = Result<Vec<Notification>, ApiError>> + Send;

    /// `POST readAllNoti`: fire-and-forget.
    fn read_all_notifications(&self) -> impl Future<Output = Result<(), ApiError>> + Send;
}
