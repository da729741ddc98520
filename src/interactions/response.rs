//! Response protocol state machine
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation
//!
//! A handler result is either answered synchronously or split into an
//! immediate placeholder acknowledgement plus exactly one background task
//! that delivers the real payload through a follow-up call. A deferred task
//! resolving to another deferral (or to a modal) is a protocol violation:
//! surfaced as a diagnostic follow-up in development, logged otherwise.

use std::sync::Arc;

use anyhow::Result;
use log::{error, warn};
use serde_json::json;
use uuid::Uuid;

use crate::api::client::InteractionClient;
use crate::api::enums::InteractionResponseType;
use crate::api::types::{InteractionResponse, MessageResponse, Reply};
use crate::commands::types::{BoxFuture, CommandResponse, DeferredResponse};
use crate::error::Error;

/// Fire-and-forget background task registration provided by the host
/// environment. The host guarantees a spawned task runs to completion (or
/// observable failure) independently of the synchronous response.
pub trait TaskSpawner: Send + Sync {
    fn spawn(&self, task: BoxFuture<()>);
}

/// [`TaskSpawner`] backed by `tokio::spawn`.
pub struct TokioSpawner;

impl TaskSpawner for TokioSpawner {
    fn spawn(&self, task: BoxFuture<()>) {
        tokio::spawn(task);
    }
}

/// Render an error as the development-mode diagnostic message.
pub(crate) fn diagnostic_message(error: &anyhow::Error) -> MessageResponse {
    let description = format!("{error}\n```{error:?}```");
    MessageResponse::default().embed(json!({
        "title": "🚨  Error",
        "description": description,
        "color": 0xFC484A,
        "footer": { "text": "Errors are only returned during development" }
    }))
}

/// Drive a handler result to its synchronous wire reply, scheduling the
/// background half of a deferred response on the way.
pub(crate) async fn transform_response(
    request_id: Uuid,
    token: &str,
    client: &Arc<dyn InteractionClient>,
    spawner: &Arc<dyn TaskSpawner>,
    development: bool,
    response: CommandResponse,
) -> Result<Reply> {
    match response {
        CommandResponse::Deferred(deferred) => {
            let kind = if deferred.update {
                InteractionResponseType::DeferredMessageUpdate
            } else {
                InteractionResponseType::DeferredChannelMessageWithSource
            };
            spawner.spawn(Box::pin(complete_deferred(
                request_id,
                token.to_string(),
                Arc::clone(client),
                deferred,
                development,
            )));
            Ok(Reply::Json(InteractionResponse::new(kind, None)))
        }
        CommandResponse::Modal(modal) => Ok(Reply::Json(InteractionResponse::new(
            InteractionResponseType::Modal,
            Some(serde_json::to_value(&modal)?),
        ))),
        CommandResponse::Message(message) => {
            let kind = if message.update {
                InteractionResponseType::UpdateMessage
            } else {
                InteractionResponseType::ChannelMessageWithSource
            };
            let (body, files) = message.into_payload()?;
            let payload = InteractionResponse::new(kind, Some(body));
            if files.is_empty() {
                Ok(Reply::Json(payload))
            } else {
                Ok(Reply::Multipart { payload, files })
            }
        }
    }
}

/// The background half of a deferred response: await the task, enforce the
/// at-most-one-deferral contract, deliver the payload.
async fn complete_deferred(
    request_id: Uuid,
    token: String,
    client: Arc<dyn InteractionClient>,
    deferred: DeferredResponse,
    development: bool,
) {
    let update = deferred.update;
    let outcome = deferred.task.await.and_then(|response| match response {
        CommandResponse::Message(message) => Ok(message),
        CommandResponse::Deferred(_) => Err(Error::DeferredTwice.into()),
        CommandResponse::Modal(_) => Err(Error::DeferredModal.into()),
    });

    let message = match outcome {
        Ok(message) => message,
        Err(err) if development => {
            warn!("[{request_id}] Deferred handler failed: {err:#}");
            diagnostic_message(&err)
        }
        Err(err) => {
            error!("[{request_id}] Deferred handler failed: {err:#}");
            return;
        }
    };

    let delivery = if update {
        client.edit_original(&token, message).await
    } else {
        client.create_followup(&token, message).await
    };
    if let Err(err) = delivery {
        error!("[{request_id}] Deferred delivery failed: {err:#}");
    }
}
