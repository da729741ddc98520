//! Ping interactions

use crate::api::types::{InteractionResponse, Reply};

pub(crate) fn handle_ping() -> Reply {
    Reply::Json(InteractionResponse::pong())
}
