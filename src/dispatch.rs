//! Interaction dispatcher
//!
//! The top-level entry point: owns the declared command set, routes each
//! inbound interaction by kind, and drives handler results through the
//! response protocol. Handler errors are caught here — rendered as a
//! diagnostic reply in development, propagated for a generic failure
//! response otherwise.

use std::sync::Arc;

use anyhow::Result;
use log::{info, warn};
use uuid::Uuid;

use crate::api::client::InteractionClient;
use crate::api::enums::InteractionType;
use crate::api::types::{Interaction, Reply};
use crate::commands::deploy::deploy_commands;
use crate::commands::tree::CommandSet;
use crate::commands::types::CommandResponse;
use crate::interactions::response::{diagnostic_message, transform_response, TaskSpawner, TokioSpawner};
use crate::interactions::{autocomplete, command, component, modal, ping};

pub struct Dispatcher {
    commands: CommandSet,
    client: Arc<dyn InteractionClient>,
    spawner: Arc<dyn TaskSpawner>,
    development: bool,
}

impl Dispatcher {
    /// Create a dispatcher over a command set. Background tasks go through
    /// `tokio::spawn` unless a different spawner is supplied.
    pub fn new(commands: CommandSet, client: Arc<dyn InteractionClient>) -> Self {
        Self {
            commands,
            client,
            spawner: Arc::new(TokioSpawner),
            development: false,
        }
    }

    /// Replace the background task spawner.
    pub fn with_spawner(mut self, spawner: Arc<dyn TaskSpawner>) -> Self {
        self.spawner = spawner;
        self
    }

    /// In development, handler failures come back as diagnostic messages
    /// instead of opaque errors.
    pub fn development(mut self, enabled: bool) -> Self {
        self.development = enabled;
        self
    }

    pub(crate) fn commands(&self) -> &CommandSet {
        &self.commands
    }

    /// Record the command set and push it to the platform.
    pub async fn deploy(&self, guild_id: Option<&str>) -> Result<()> {
        deploy_commands(self.client.as_ref(), &self.commands, guild_id).await
    }

    /// Route one inbound interaction to its reply.
    ///
    /// Routing misses come back as `Reply::NotFound`, never as `Err`. An
    /// `Err` means a handler failed outside development mode and the caller
    /// should answer with a generic failure.
    pub async fn dispatch(&self, interaction: Interaction) -> Result<Reply> {
        let request_id = Uuid::new_v4();
        info!(
            "[{request_id}] 📥 Interaction received | Type: {} | Id: {}",
            interaction.kind, interaction.id
        );

        let reply = match interaction.kind {
            InteractionType::Ping => Ok(ping::handle_ping()),
            InteractionType::ApplicationCommand => {
                command::handle_command(self, request_id, interaction).await
            }
            InteractionType::MessageComponent => {
                component::handle_component(self, request_id, interaction).await
            }
            InteractionType::ModalSubmit => {
                modal::handle_modal(self, request_id, interaction).await
            }
            InteractionType::ApplicationCommandAutocomplete => {
                autocomplete::handle_autocomplete(self, request_id, interaction).await
            }
        };

        if let Ok(Reply::NotFound(reason)) = &reply {
            warn!("[{request_id}] Routing miss: {reason}");
        }
        reply
    }

    /// Turn a finished handler result into the synchronous reply, applying
    /// the development-mode error disposition.
    pub(crate) async fn finish(
        &self,
        request_id: Uuid,
        token: &str,
        result: Result<CommandResponse>,
    ) -> Result<Reply> {
        let response = match result {
            Ok(response) => response,
            Err(err) if self.development => {
                warn!("[{request_id}] Handler failed: {err:#}");
                CommandResponse::Message(diagnostic_message(&err))
            }
            Err(err) => return Err(err),
        };
        transform_response(
            request_id,
            token,
            &self.client,
            &self.spawner,
            self.development,
            response,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::{json, Value};

    use super::*;
    use crate::api::types::{CommandSchema, MessageResponse};
    use crate::api::Choice;
    use crate::commands::hooks::{use_button, use_description, use_input, use_modal};
    use crate::commands::options::{NumberOption, StringOption};
    use crate::commands::types::{handler, BoxFuture, CommandHandler};

    #[derive(Default)]
    struct RecordingClient {
        followups: Mutex<Vec<(String, Value)>>,
        edits: Mutex<Vec<(String, Value)>>,
    }

    #[async_trait]
    impl InteractionClient for RecordingClient {
        async fn create_followup(&self, token: &str, message: MessageResponse) -> Result<()> {
            let body = serde_json::to_value(&message)?;
            self.followups.lock().unwrap().push((token.to_string(), body));
            Ok(())
        }

        async fn edit_original(&self, token: &str, message: MessageResponse) -> Result<()> {
            let body = serde_json::to_value(&message)?;
            self.edits.lock().unwrap().push((token.to_string(), body));
            Ok(())
        }

        async fn bulk_overwrite_commands(
            &self,
            _guild_id: Option<&str>,
            _commands: &[CommandSchema],
        ) -> Result<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct QueueSpawner {
        tasks: Mutex<Vec<BoxFuture<()>>>,
    }

    impl QueueSpawner {
        async fn run_all(&self) {
            let tasks: Vec<_> = self.tasks.lock().unwrap().drain(..).collect();
            for task in tasks {
                task.await;
            }
        }
    }

    impl TaskSpawner for QueueSpawner {
        fn spawn(&self, task: BoxFuture<()>) {
            self.tasks.lock().unwrap().push(task);
        }
    }

    fn add() -> CommandHandler {
        use_description("Add two numbers");
        let a = NumberOption::new("a", "First operand").required();
        let b = NumberOption::new("b", "Second operand").required();
        handler(move |_interaction| async move {
            Ok(CommandResponse::text(format!("{a} + {b} = {}", a + b)))
        })
    }

    fn slow() -> CommandHandler {
        use_description("Respond later");
        handler(|_interaction| async move {
            Ok(CommandResponse::deferred(async move {
                Ok(CommandResponse::text("done"))
            }))
        })
    }

    fn confirm() -> CommandHandler {
        use_description("Ask for confirmation");
        use_button(|interaction: Interaction| async move {
            let custom_id = interaction
                .data
                .as_ref()
                .and_then(|data| data.custom_id.clone())
                .unwrap_or_default();
            Ok(CommandResponse::message(
                MessageResponse::text(format!("confirmed by {custom_id}")).as_update(),
            ))
        });
        handler(|_interaction| async move { Ok(CommandResponse::text("pick one")) })
    }

    fn feedback() -> CommandHandler {
        use_description("Collect feedback");
        let (_field, text) = use_input();
        use_modal(move |_interaction| {
            let text = text.clone();
            async move { Ok(CommandResponse::text(format!("got: {text}"))) }
        });
        handler(|_interaction| async move { Ok(CommandResponse::text("opening modal")) })
    }

    fn search() -> CommandHandler {
        use_description("Search the archive");
        StringOption::new("query", "what to look for")
            .autocomplete(|_interaction| async move {
                Ok(vec![Choice::string("First", "first"), Choice::string("Second", "second")])
            })
            .required();
        handler(|_interaction| async move { Ok(CommandResponse::text("searching")) })
    }

    fn broken() -> CommandHandler {
        use_description("Always fails");
        handler(|_interaction| async move { anyhow::bail!("backend exploded") })
    }

    struct Harness {
        dispatcher: Dispatcher,
        client: Arc<RecordingClient>,
        spawner: Arc<QueueSpawner>,
    }

    fn harness(development: bool) -> Harness {
        let _ = env_logger::builder().is_test(true).try_init();
        let client = Arc::new(RecordingClient::default());
        let spawner = Arc::new(QueueSpawner::default());
        let commands = CommandSet::new()
            .command("add", add)
            .command("slow", slow)
            .command("confirm", confirm)
            .command("feedback", feedback)
            .command("search", search)
            .command("broken", broken);
        let dispatcher = Dispatcher::new(commands, client.clone())
            .with_spawner(spawner.clone())
            .development(development);
        Harness {
            dispatcher,
            client,
            spawner,
        }
    }

    fn interaction(value: Value) -> Interaction {
        serde_json::from_value(value).expect("interaction")
    }

    fn reply_json(reply: &Reply) -> Value {
        serde_json::to_value(reply.payload().expect("payload")).expect("serialize")
    }

    #[tokio::test]
    async fn test_ping_pong() {
        let harness = harness(false);
        let reply = harness
            .dispatcher
            .dispatch(interaction(json!({ "id": "1", "type": 1, "token": "tok" })))
            .await
            .expect("reply");
        assert_eq!(reply_json(&reply), json!({ "type": 1 }));
    }

    #[tokio::test]
    async fn test_command_dispatch_extracts_options() {
        let harness = harness(false);
        let reply = harness
            .dispatcher
            .dispatch(interaction(json!({
                "id": "1", "type": 2, "token": "tok",
                "data": {
                    "name": "add", "type": 1,
                    "options": [
                        { "name": "a", "type": 10, "value": 1 },
                        { "name": "b", "type": 10, "value": 2 }
                    ]
                }
            })))
            .await
            .expect("reply");

        assert_eq!(
            reply_json(&reply),
            json!({ "type": 4, "data": { "content": "1 + 2 = 3" } })
        );
    }

    #[tokio::test]
    async fn test_unknown_command_is_not_found_not_an_error() {
        let harness = harness(false);
        let reply = harness
            .dispatcher
            .dispatch(interaction(json!({
                "id": "1", "type": 2, "token": "tok",
                "data": { "name": "missing", "type": 1 }
            })))
            .await
            .expect("reply");
        assert!(reply.is_not_found());
    }

    #[tokio::test]
    async fn test_deferred_command_acknowledges_then_follows_up() {
        let harness = harness(false);
        let reply = harness
            .dispatcher
            .dispatch(interaction(json!({
                "id": "1", "type": 2, "token": "tok",
                "data": { "name": "slow", "type": 1 }
            })))
            .await
            .expect("reply");

        assert_eq!(reply_json(&reply), json!({ "type": 5 }));
        harness.spawner.run_all().await;

        let followups = harness.client.followups.lock().unwrap();
        assert_eq!(
            followups.as_slice(),
            &[("tok".to_string(), json!({ "content": "done" }))]
        );
    }

    #[tokio::test]
    async fn test_component_round_trip_with_author_suffix() {
        let harness = harness(false);
        let reply = harness
            .dispatcher
            .dispatch(interaction(json!({
                "id": "1", "type": 3, "token": "tok",
                "data": { "custom_id": "parley:1/confirm$0#user42", "component_type": 2 }
            })))
            .await
            .expect("reply");

        let body = reply_json(&reply);
        assert_eq!(body["type"], json!(7));
        assert_eq!(
            body["data"]["content"],
            json!("confirmed by parley:1/confirm$0#user42")
        );
    }

    #[tokio::test]
    async fn test_component_with_unknown_ordinal_is_not_found() {
        let harness = harness(false);
        let reply = harness
            .dispatcher
            .dispatch(interaction(json!({
                "id": "1", "type": 3, "token": "tok",
                "data": { "custom_id": "parley:1/confirm$9#", "component_type": 2 }
            })))
            .await
            .expect("reply");
        assert!(reply.is_not_found());
    }

    #[tokio::test]
    async fn test_modal_submission_surfaces_field_values() {
        let harness = harness(false);
        let reply = harness
            .dispatcher
            .dispatch(interaction(json!({
                "id": "1", "type": 5, "token": "tok",
                "data": {
                    "custom_id": "parley:1/feedback$1#",
                    "components": [
                        { "type": 1, "components": [
                            { "type": 4, "custom_id": "parley:1/feedback$0#", "value": "love it" }
                        ]}
                    ]
                }
            })))
            .await
            .expect("reply");

        assert_eq!(
            reply_json(&reply),
            json!({ "type": 4, "data": { "content": "got: love it" } })
        );
    }

    #[tokio::test]
    async fn test_autocomplete_answers_choices() {
        let harness = harness(false);
        let reply = harness
            .dispatcher
            .dispatch(interaction(json!({
                "id": "1", "type": 4, "token": "tok",
                "data": {
                    "name": "search", "type": 1,
                    "options": [{ "name": "query", "type": 3, "value": "fi", "focused": true }]
                }
            })))
            .await
            .expect("reply");

        assert_eq!(
            reply_json(&reply),
            json!({
                "type": 8,
                "data": { "choices": [
                    { "name": "First", "value": "first" },
                    { "name": "Second", "value": "second" }
                ]}
            })
        );
    }

    #[tokio::test]
    async fn test_handler_error_propagates_outside_development() {
        let harness = harness(false);
        let err = harness
            .dispatcher
            .dispatch(interaction(json!({
                "id": "1", "type": 2, "token": "tok",
                "data": { "name": "broken", "type": 1 }
            })))
            .await
            .expect_err("handler error");
        assert!(err.to_string().contains("backend exploded"));
    }

    #[tokio::test]
    async fn test_handler_error_renders_diagnostic_in_development() {
        let harness = harness(true);
        let reply = harness
            .dispatcher
            .dispatch(interaction(json!({
                "id": "1", "type": 2, "token": "tok",
                "data": { "name": "broken", "type": 1 }
            })))
            .await
            .expect("reply");

        let body = reply_json(&reply);
        assert_eq!(body["type"], json!(4));
        assert!(body["data"]["embeds"][0]["description"]
            .as_str()
            .expect("description")
            .contains("backend exploded"));
    }

    #[tokio::test]
    async fn test_concurrent_dispatches_do_not_share_state() {
        let harness = Arc::new(harness(false));
        let mut joins = Vec::new();
        for i in 0..16_i64 {
            let harness = harness.clone();
            joins.push(tokio::spawn(async move {
                let reply = harness
                    .dispatcher
                    .dispatch(interaction(json!({
                        "id": "1", "type": 2, "token": "tok",
                        "data": {
                            "name": "add", "type": 1,
                            "options": [
                                { "name": "a", "type": 10, "value": i },
                                { "name": "b", "type": 10, "value": i }
                            ]
                        }
                    })))
                    .await
                    .expect("reply");
                (i, reply_json(&reply))
            }));
        }
        for join in joins {
            let (i, body) = join.await.expect("join");
            let expected = format!("{i} + {i} = {}", i + i);
            assert_eq!(body["data"]["content"], json!(expected));
        }
    }
}
