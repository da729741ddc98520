//! Crate error types
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation

use thiserror::Error;

/// Errors raised while building the command schema or driving the response
/// protocol.
///
/// Schema errors (`InvalidName`, `MissingDescription`, `GroupTooDeep`) are
/// returned by the recorder and indicate a wiring defect that should fail
/// loudly at startup. Protocol errors (`DeferredTwice`, `DeferredModal`) are
/// produced by the background half of a deferred response and are caught at
/// the dispatch boundary.
#[derive(Debug, Error)]
pub enum Error {
    /// A command, group or option name contains one of the characters
    /// reserved for component custom ids.
    #[error("name {0:?} must not contain ':', '/', '$' or '#' characters")]
    InvalidName(String),

    /// A chat-input command body never declared a non-empty description.
    #[error("command {0:?} must call use_description(\"...\") with a non-empty string")]
    MissingDescription(String),

    /// Command groups may only nest two levels deep (group, subgroup).
    #[error("command group {0:?} nests deeper than two levels")]
    GroupTooDeep(String),

    /// The background half of a deferred response resolved to another
    /// deferral.
    #[error("response can only be deferred once")]
    DeferredTwice,

    /// The background half of a deferred response resolved to a modal, which
    /// cannot be delivered through a follow-up call.
    #[error("a modal cannot be opened from a deferred response")]
    DeferredModal,
}
