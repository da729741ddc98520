//! Application command interactions

use anyhow::Result;
use log::debug;
use uuid::Uuid;

use crate::api::types::{Interaction, Reply};
use crate::commands::instantiate::instantiate_command_handler;
use crate::dispatch::Dispatcher;

use super::matchers::match_command;

pub(crate) async fn handle_command(
    dispatcher: &Dispatcher,
    request_id: Uuid,
    interaction: Interaction,
) -> Result<Reply> {
    let Some((command_id, command, options)) =
        match_command(&interaction, dispatcher.commands())
    else {
        debug!(
            "[{request_id}] No command registered for {:?}",
            interaction.data.as_ref().and_then(|data| data.name.as_deref())
        );
        return Ok(Reply::NotFound("command not found"));
    };

    debug!("[{request_id}] Dispatching {command_id}");
    let resolved = interaction
        .data
        .as_ref()
        .and_then(|data| data.resolved.clone())
        .unwrap_or_default();
    let handler = instantiate_command_handler(&command_id, &command, options, resolved);

    let token = interaction.token.clone();
    let result = handler(interaction).await;
    dispatcher.finish(request_id, &token, result).await
}
