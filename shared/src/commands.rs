use serde::{Deserialize, Serialize};

use crate::snapshot::Entity;

/// Moderation action aimed at one player. The map only names the target;
/// the backend validates and executes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ModerationCommand {
    Teleport {
        steam_id: String,
    },
    Mute {
        steam_id: String,
        minutes: u32,
    },
    Kick {
        steam_id: String,
        reason: String,
    },
    Ban {
        steam_id: String,
        reason: String,
    },
}

impl ModerationCommand {
    pub fn target_id(&self) -> &str {
        match self {
            Self::Teleport { steam_id }
            | Self::Mute { steam_id, .. }
            | Self::Kick { steam_id, .. }
            | Self::Ban { steam_id, .. } => steam_id,
        }
    }

    /// Path segment used by the command endpoint.
    pub fn action(&self) -> &'static str {
        match self {
            Self::Teleport { .. } => "teleport",
            Self::Mute { .. } => "mute",
            Self::Kick { .. } => "kick",
            Self::Ban { .. } => "ban",
        }
    }

    pub fn teleport(entity: &Entity) -> Self {
        Self::Teleport {
            steam_id: entity.id.clone(),
        }
    }

    pub fn mute(entity: &Entity, minutes: u32) -> Self {
        Self::Mute {
            steam_id: entity.id.clone(),
            minutes,
        }
    }

    pub fn kick(entity: &Entity, reason: impl Into<String>) -> Self {
        Self::Kick {
            steam_id: entity.id.clone(),
            reason: reason.into(),
        }
    }

    pub fn ban(entity: &Entity, reason: impl Into<String>) -> Self {
        Self::Ban {
            steam_id: entity.id.clone(),
            reason: reason.into(),
        }
    }
}

/// Where the selection panel sends commands.
pub trait CommandSink {
    fn submit(&self, command: ModerationCommand);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::fixtures::entity;

    #[test]
    fn commands_target_the_entity() {
        let target = entity("7656", 1.0, 1.0);
        let commands = [
            ModerationCommand::teleport(&target),
            ModerationCommand::mute(&target, 15),
            ModerationCommand::kick(&target, "afk"),
            ModerationCommand::ban(&target, "cheating"),
        ];
        for command in &commands {
            assert_eq!(command.target_id(), "7656");
        }
        let actions: Vec<_> = commands.iter().map(ModerationCommand::action).collect();
        assert_eq!(actions, ["teleport", "mute", "kick", "ban"]);
    }

    #[test]
    fn serializes_with_action_tag() {
        let target = entity("7656", 1.0, 1.0);
        let json = serde_json::to_value(ModerationCommand::mute(&target, 30)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "action": "mute", "steam_id": "7656", "minutes": 30 })
        );
    }
}
