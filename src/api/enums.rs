//! Wire-level constants for the interactions protocol
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation
//!
//! All of these serialize as the bare integers the platform expects.

use std::fmt;

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident = $value:literal,)+ }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant = $value,)+
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> u8 {
                value as u8
            }
        }

        impl TryFrom<u8> for $name {
            type Error = u8;

            fn try_from(value: u8) -> Result<Self, u8> {
                match value {
                    $($value => Ok(Self::$variant),)+
                    other => Err(other),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", *self as u8)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_u8(*self as u8)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = u8::deserialize(deserializer)?;
                Self::try_from(value).map_err(|v| {
                    de::Error::invalid_value(
                        de::Unexpected::Unsigned(u64::from(v)),
                        &concat!("a valid ", stringify!($name), " value"),
                    )
                })
            }
        }
    };
}

wire_enum! {
    /// Inbound interaction kind.
    InteractionType {
        Ping = 1,
        ApplicationCommand = 2,
        MessageComponent = 3,
        ApplicationCommandAutocomplete = 4,
        ModalSubmit = 5,
    }
}

wire_enum! {
    /// Application command kind. Doubles as the kind tag inside command ids,
    /// which is why chat-input, user and message commands can share a name.
    ApplicationCommandType {
        ChatInput = 1,
        User = 2,
        Message = 3,
    }
}

wire_enum! {
    /// Application command option kind.
    ApplicationCommandOptionType {
        SubCommand = 1,
        SubCommandGroup = 2,
        String = 3,
        Integer = 4,
        Boolean = 5,
        User = 6,
        Channel = 7,
        Role = 8,
        Mentionable = 9,
        Number = 10,
        Attachment = 11,
    }
}

wire_enum! {
    /// Outbound interaction response kind.
    InteractionResponseType {
        Pong = 1,
        ChannelMessageWithSource = 4,
        DeferredChannelMessageWithSource = 5,
        DeferredMessageUpdate = 6,
        UpdateMessage = 7,
        ApplicationCommandAutocompleteResult = 8,
        Modal = 9,
    }
}

wire_enum! {
    /// Message component kind.
    ComponentType {
        ActionRow = 1,
        Button = 2,
        SelectMenu = 3,
        TextInput = 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_as_integer() {
        let json = serde_json::to_string(&InteractionResponseType::ChannelMessageWithSource)
            .expect("serialize");
        assert_eq!(json, "4");
    }

    #[test]
    fn test_deserialize_from_integer() {
        let kind: InteractionType = serde_json::from_str("3").expect("deserialize");
        assert_eq!(kind, InteractionType::MessageComponent);
    }

    #[test]
    fn test_deserialize_rejects_unknown() {
        let result: Result<InteractionType, _> = serde_json::from_str("42");
        assert!(result.is_err());
    }

    #[test]
    fn test_round_trip_u8() {
        assert_eq!(u8::from(ApplicationCommandType::Message), 3);
        assert_eq!(
            ApplicationCommandType::try_from(3),
            Ok(ApplicationCommandType::Message)
        );
        assert_eq!(ApplicationCommandType::try_from(9), Err(9));
    }
}
