//! Command registry
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation for declaration-tree dispatch
//!
//! Chat-input commands form a tree at most two groups deep; user and message
//! context-menu commands are flat maps. The tree shape is validated once when
//! the recorder derives the schema.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::types::{Command, CommandHandler};

/// One node of the chat-input command tree: a leaf declaration or a named
/// group of further nodes.
#[derive(Clone)]
pub enum CommandNode {
    Leaf(Command),
    Group(BTreeMap<String, CommandNode>),
}

/// Builder for a command group (or subgroup).
///
/// # Example
///
/// ```ignore
/// let commands = CommandSet::new()
///     .command("add", add)
///     .group("notes", Group::new().command("write", write).command("list", list));
/// ```
#[derive(Clone, Default)]
pub struct Group {
    entries: BTreeMap<String, CommandNode>,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a subcommand to this group.
    pub fn command<F>(mut self, name: &str, definition: F) -> Self
    where
        F: Fn() -> CommandHandler + Send + Sync + 'static,
    {
        self.entries
            .insert(name.to_string(), CommandNode::Leaf(Arc::new(definition)));
        self
    }

    /// Add a subgroup. The recorder rejects groups nested deeper than two
    /// levels.
    pub fn group(mut self, name: &str, group: Group) -> Self {
        self.entries
            .insert(name.to_string(), CommandNode::Group(group.entries));
        self
    }
}

/// Every command the dispatcher knows about.
///
/// Multiple kinds can share a name: the kind tag inside the command id keeps
/// chat-input, user and message commands apart.
#[derive(Clone, Default)]
pub struct CommandSet {
    pub(crate) commands: BTreeMap<String, CommandNode>,
    pub(crate) user_commands: BTreeMap<String, Command>,
    pub(crate) message_commands: BTreeMap<String, Command>,
}

impl CommandSet {
    /// Create a new empty command set
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a top-level chat-input command.
    pub fn command<F>(mut self, name: &str, definition: F) -> Self
    where
        F: Fn() -> CommandHandler + Send + Sync + 'static,
    {
        self.commands
            .insert(name.to_string(), CommandNode::Leaf(Arc::new(definition)));
        self
    }

    /// Register a top-level command group.
    pub fn group(mut self, name: &str, group: Group) -> Self {
        self.commands
            .insert(name.to_string(), CommandNode::Group(group.entries));
        self
    }

    /// Register a user context-menu command.
    pub fn user_command<F>(mut self, name: &str, definition: F) -> Self
    where
        F: Fn() -> CommandHandler + Send + Sync + 'static,
    {
        self.user_commands.insert(name.to_string(), Arc::new(definition));
        self
    }

    /// Register a message context-menu command.
    pub fn message_command<F>(mut self, name: &str, definition: F) -> Self
    where
        F: Fn() -> CommandHandler + Send + Sync + 'static,
    {
        self.message_commands.insert(name.to_string(), Arc::new(definition));
        self
    }

    /// Check if a top-level chat-input name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Number of registered top-level entries across all kinds
    pub fn len(&self) -> usize {
        self.commands.len() + self.user_commands.len() + self.message_commands.len()
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
            && self.user_commands.is_empty()
            && self.message_commands.is_empty()
    }
}
