//! Outbound REST calls for follow-ups and command registration
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation
//!
//! The dispatcher only ever talks to [`InteractionClient`], so tests can
//! substitute a recording mock. Follow-up endpoints authenticate through the
//! interaction token alone; only bulk command registration needs a bot token.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::multipart::{Form, Part};
use reqwest::RequestBuilder;

use super::types::{CommandSchema, MessageResponse};

pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";

/// Outbound calls the response protocol and the deploy step depend on.
#[async_trait]
pub trait InteractionClient: Send + Sync {
    /// Create a follow-up message for a deferred response.
    async fn create_followup(&self, token: &str, message: MessageResponse) -> Result<()>;

    /// Edit the original response, completing a deferred update.
    async fn edit_original(&self, token: &str, message: MessageResponse) -> Result<()>;

    /// Overwrite the full command set, globally or for one guild.
    async fn bulk_overwrite_commands(
        &self,
        guild_id: Option<&str>,
        commands: &[CommandSchema],
    ) -> Result<()>;
}

/// `reqwest`-backed [`InteractionClient`].
#[derive(Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    base_url: String,
    application_id: String,
    bot_token: Option<String>,
}

impl HttpClient {
    pub fn new(application_id: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_API_BASE.to_string(),
            application_id: application_id.into(),
            bot_token: None,
        }
    }

    /// Bot token used for command registration calls.
    pub fn with_bot_token(mut self, token: impl Into<String>) -> Self {
        self.bot_token = Some(token.into());
        self
    }

    /// Override the API base URL (for tests against a local server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn send_message(&self, request: RequestBuilder, message: MessageResponse) -> Result<()> {
        let (body, files) = message.into_payload()?;
        let request = if files.is_empty() {
            request.json(&body)
        } else {
            let mut form = Form::new().text("payload_json", serde_json::to_string(&body)?);
            for (i, file) in files.into_iter().enumerate() {
                form = form.part(
                    format!("files[{i}]"),
                    Part::bytes(file.content).file_name(file.filename),
                );
            }
            request.multipart(form)
        };
        request.send().await?.error_for_status()?;
        Ok(())
    }
}

#[async_trait]
impl InteractionClient for HttpClient {
    async fn create_followup(&self, token: &str, message: MessageResponse) -> Result<()> {
        debug!("Creating follow-up message for application {}", self.application_id);
        let url = format!(
            "{}/webhooks/{}/{}",
            self.base_url, self.application_id, token
        );
        self.send_message(self.http.post(url), message).await
    }

    async fn edit_original(&self, token: &str, message: MessageResponse) -> Result<()> {
        debug!("Editing original response for application {}", self.application_id);
        let url = format!(
            "{}/webhooks/{}/{}/messages/@original",
            self.base_url, self.application_id, token
        );
        self.send_message(self.http.patch(url), message).await
    }

    async fn bulk_overwrite_commands(
        &self,
        guild_id: Option<&str>,
        commands: &[CommandSchema],
    ) -> Result<()> {
        let token = self
            .bot_token
            .as_deref()
            .context("bulk command registration requires a bot token")?;
        let url = match guild_id {
            Some(guild_id) => format!(
                "{}/applications/{}/guilds/{}/commands",
                self.base_url, self.application_id, guild_id
            ),
            None => format!("{}/applications/{}/commands", self.base_url, self.application_id),
        };
        self.http
            .put(url)
            .header("Authorization", format!("Bot {token}"))
            .json(&commands)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The trait must stay object-safe, the dispatcher holds it as a dyn.
    fn _assert_object_safe(_: &dyn InteractionClient) {}

    #[tokio::test]
    async fn test_bulk_overwrite_requires_bot_token() {
        let client = HttpClient::new("123");
        let err = client
            .bulk_overwrite_commands(None, &[])
            .await
            .expect_err("missing token must fail");
        assert!(err.to_string().contains("bot token"));
    }
}
