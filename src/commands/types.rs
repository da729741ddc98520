//! Handler and response types for declared commands
//!
//! A command is declared as a zero-argument function that runs hooks and
//! returns the handler to invoke. The same function body is executed in
//! recording mode (to derive the schema), in handling mode (to extract live
//! option values) and in component/autocomplete instantiation modes (to
//! collect the sub-handlers it declares).

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use anyhow::Result;

use crate::api::{Choice, Interaction, MessageResponse, ModalResponse};

pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// The inner handler a command body returns, invoked once per dispatch.
pub type CommandHandler =
    Box<dyn FnOnce(Interaction) -> BoxFuture<Result<CommandResponse>> + Send>;

/// A command declaration: hooks run, then the handler comes back.
pub type Command = Arc<dyn Fn() -> CommandHandler + Send + Sync>;

/// Handler registered for a button or select menu, keyed by custom id.
pub type ComponentHandler =
    Arc<dyn Fn(Interaction) -> BoxFuture<Result<CommandResponse>> + Send + Sync>;

/// Handler registered for a modal submission, keyed by custom id.
pub type ModalHandler = ComponentHandler;

/// Callback answering autocomplete requests for one option.
pub type AutocompleteCallback =
    Arc<dyn Fn(Interaction) -> BoxFuture<Result<Vec<Choice>>> + Send + Sync>;

/// What a handler resolves to.
///
/// `Message` and `Modal` answer the interaction synchronously. `Deferred`
/// acknowledges immediately with a placeholder and finishes later through a
/// follow-up call; the contained task must resolve to a `Message` — resolving
/// to another `Deferred` (or a `Modal`) violates the response protocol.
pub enum CommandResponse {
    Message(MessageResponse),
    Modal(ModalResponse),
    Deferred(DeferredResponse),
}

/// The suspended half of a deferred response.
pub struct DeferredResponse {
    pub(crate) update: bool,
    pub(crate) task: BoxFuture<Result<CommandResponse>>,
}

impl CommandResponse {
    pub fn message(message: MessageResponse) -> Self {
        CommandResponse::Message(message)
    }

    /// Immediate plain-text message.
    pub fn text(content: impl Into<String>) -> Self {
        CommandResponse::Message(MessageResponse::text(content))
    }

    pub fn modal(modal: ModalResponse) -> Self {
        CommandResponse::Modal(modal)
    }

    /// Acknowledge now with DEFERRED_CHANNEL_MESSAGE_WITH_SOURCE, deliver the
    /// task's result as a follow-up message.
    pub fn deferred<F>(task: F) -> Self
    where
        F: Future<Output = Result<CommandResponse>> + Send + 'static,
    {
        CommandResponse::Deferred(DeferredResponse {
            update: false,
            task: Box::pin(task),
        })
    }

    /// Acknowledge now with DEFERRED_MESSAGE_UPDATE, deliver the task's
    /// result by editing the original message.
    pub fn deferred_update<F>(task: F) -> Self
    where
        F: Future<Output = Result<CommandResponse>> + Send + 'static,
    {
        CommandResponse::Deferred(DeferredResponse {
            update: true,
            task: Box::pin(task),
        })
    }
}

impl From<MessageResponse> for CommandResponse {
    fn from(message: MessageResponse) -> Self {
        CommandResponse::Message(message)
    }
}

impl From<ModalResponse> for CommandResponse {
    fn from(modal: ModalResponse) -> Self {
        CommandResponse::Modal(modal)
    }
}

/// Box an async closure into a [`CommandHandler`].
///
/// # Example
///
/// ```ignore
/// fn ping() -> CommandHandler {
///     use_description("Check the bot is alive");
///     handler(|_interaction| async move { Ok(CommandResponse::text("pong")) })
/// }
/// ```
pub fn handler<F, Fut>(f: F) -> CommandHandler
where
    F: FnOnce(Interaction) -> Fut + Send + 'static,
    Fut: Future<Output = Result<CommandResponse>> + Send + 'static,
{
    Box::new(move |interaction| -> BoxFuture<Result<CommandResponse>> {
        Box::pin(f(interaction))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_conversions() {
        let response: CommandResponse = MessageResponse::text("hi").into();
        assert!(matches!(response, CommandResponse::Message(_)));

        let response: CommandResponse = ModalResponse::new("id", "title").into();
        assert!(matches!(response, CommandResponse::Modal(_)));
    }

    #[tokio::test]
    async fn test_handler_boxes_async_closures() {
        let boxed = handler(|_interaction| async move { Ok(CommandResponse::text("pong")) });
        let interaction: Interaction = serde_json::from_value(serde_json::json!({
            "id": "1", "type": 2, "token": "tok"
        }))
        .expect("interaction");

        let response = boxed(interaction).await.expect("response");
        match response {
            CommandResponse::Message(message) => {
                assert_eq!(message.content.as_deref(), Some("pong"));
            }
            _ => panic!("expected message response"),
        }
    }
}
