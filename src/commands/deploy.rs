//! Command deployment
//!
//! Records the declared command set and pushes it through the client's
//! bulk-overwrite call, globally or for a single test guild.

use anyhow::Result;
use log::info;

use crate::api::client::InteractionClient;

use super::recorder::record_commands;
use super::tree::CommandSet;

/// Record and register the full command set in one call.
pub async fn deploy_commands(
    client: &dyn InteractionClient,
    set: &CommandSet,
    guild_id: Option<&str>,
) -> Result<()> {
    let schemas = record_commands(set)?;
    match guild_id {
        Some(guild_id) => info!(
            "Deploying {} commands to guild {guild_id}",
            schemas.len()
        ),
        None => info!("Deploying {} commands globally", schemas.len()),
    }
    client.bulk_overwrite_commands(guild_id, &schemas).await
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::api::types::{CommandSchema, MessageResponse};
    use crate::commands::hooks::use_description;
    use crate::commands::types::{handler, CommandHandler, CommandResponse};

    #[derive(Default)]
    struct RecordingClient {
        deployed: Mutex<Vec<(Option<String>, usize)>>,
    }

    #[async_trait]
    impl InteractionClient for RecordingClient {
        async fn create_followup(&self, _token: &str, _message: MessageResponse) -> Result<()> {
            Ok(())
        }

        async fn edit_original(&self, _token: &str, _message: MessageResponse) -> Result<()> {
            Ok(())
        }

        async fn bulk_overwrite_commands(
            &self,
            guild_id: Option<&str>,
            commands: &[CommandSchema],
        ) -> Result<()> {
            self.deployed
                .lock()
                .unwrap()
                .push((guild_id.map(str::to_string), commands.len()));
            Ok(())
        }
    }

    fn ping() -> CommandHandler {
        use_description("Check the bot is alive");
        handler(|_interaction| async move { Ok(CommandResponse::text("pong")) })
    }

    #[tokio::test]
    async fn test_deploy_pushes_recorded_schema() {
        let client = RecordingClient::default();
        let set = CommandSet::new().command("ping", ping);

        deploy_commands(&client, &set, Some("guild-1")).await.expect("deploy");

        let deployed = client.deployed.lock().unwrap();
        assert_eq!(deployed.as_slice(), &[(Some("guild-1".to_string()), 1)]);
    }

    #[tokio::test]
    async fn test_deploy_surfaces_schema_errors() {
        let client = RecordingClient::default();
        let set = CommandSet::new().command("a:b", ping);

        let err = deploy_commands(&client, &set, None).await.expect_err("invalid name");
        assert!(err.to_string().contains("a:b"));
        assert!(client.deployed.lock().unwrap().is_empty());
    }
}
