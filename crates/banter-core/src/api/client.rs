use std::future::Future;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::api::Gateway;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::models::{Conversation, Draft, Message, Notification, User};

/// Every backend payload arrives wrapped in `{"data": ...}`.
/// A missing or null `data` field is coerced to the default ("no
/// update") rather than treated as an error.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
struct Envelope<T> {
    #[serde(default)]
    data: Option<T>,
}

/// reqwest-backed implementation of the backend endpoints.
pub struct ApiClient {
    config: ClientConfig,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.token {
            Some(token) => builder.header("Authorization", format!("Bearer {}", token)),
            None => builder,
        }
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status { status, body });
        }
        Ok(response)
    }

    async fn get_json<T>(&self, url: String) -> Result<Option<T>, ApiError>
    where
        T: DeserializeOwned,
    {
        let response = self.request(self.client.get(&url)).send().await?;
        let response = Self::check(response).await?;
        let body = response.bytes().await?;
        let envelope: Envelope<T> = serde_json::from_slice(&body)?;
        Ok(envelope.data)
    }
}

impl Gateway for ApiClient {
    fn conversations(&self) -> impl Future<Output = Result<Vec<Conversation>, ApiError>> + Send {
        async move {
            let url = format!("{}/conversations", self.config.base_url);
            Ok(self.get_json(url).await?.unwrap_or_default())
        }
    }

    fn messages(
        &self,
        conversation_id: &str,
        skip: usize,
    ) -> impl Future<Output = Result<Vec<Message>, ApiError>> + Send {
        async move {
            let url = format!(
                "{}/messages?skip={}&conv_id={}",
                self.config.base_url, skip, conversation_id
            );
            Ok(self.get_json(url).await?.unwrap_or_default())
        }
    }

    fn last_message(
        &self,
        conversation_id: &str,
    ) -> impl Future<Output = Result<Option<Message>, ApiError>> + Send {
        async move {
            let url = format!(
                "{}/message/last?conv_id={}",
                self.config.base_url, conversation_id
            );
            self.get_json(url).await
        }
    }

    fn members(
        &self,
        conversation_id: &str,
    ) -> impl Future<Output = Result<Vec<User>, ApiError>> + Send {
        async move {
            let url = format!(
                "{}/conversation/users?convId={}",
                self.config.base_url, conversation_id
            );
            Ok(self.get_json(url).await?.unwrap_or_default())
        }
    }

    fn send_message(
        &self,
        conversation_id: &str,
        draft: &Draft,
    ) -> impl Future<Output = Result<(), ApiError>> + Send {
        let mut form = reqwest::multipart::Form::new().text("text", draft.text.clone());
        if let Some(attachment) = &draft.attachment {
            form = form.part(
                "attachment",
                reqwest::multipart::Part::bytes(attachment.bytes.clone())
                    .file_name(attachment.file_name.clone()),
            );
        }

        async move {
            let url = format!("{}/message?conv_id={}", self.config.base_url, conversation_id);
            let response = self
                .request(self.client.post(&url))
                .multipart(form)
                .send()
                .await?;
            Self::check(response).await?;
            Ok(())
        }
    }

    fn notifications(
        &self,
        skip: usize,
    ) -> impl Future<Output = Result<Vec<Notification>, ApiError>> + Send {
        async move {
            let url = format!("{}/noti?skip={}", self.config.base_url, skip);
            Ok(self.get_json(url).await?.unwrap_or_default())
        }
    }

    fn read_all_notifications(&self) -> impl Future<Output = Result<(), ApiError>> + Send {
        async move {
            let url = format!("{}/readAllNoti", self.config.base_url);
            let response = self.request(self.client.post(&url)).send().await?;
            Self::check(response).await?;
            Ok(())
        }
    }
}
