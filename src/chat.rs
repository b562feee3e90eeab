use std::collections::VecDeque;

use crate::constants::{CHAT_HISTORY_LIMIT, CHAT_RECENT_LIMIT};
use crate::engine::GameWorld;
use crate::error::{GameError, GameResult};
use crate::server_utils::sanitize_chat_text;
use crate::types::ChatMessage;

/// Append-only chat buffer bounded to the most recent messages.
#[derive(Clone, Debug, Default)]
pub struct ChatLog {
    messages: VecDeque<ChatMessage>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post(
        &mut self,
        world: &GameWorld,
        player_id: &str,
        text: &str,
        now_ms: u64,
    ) -> GameResult<()> {
        if player_id.trim().is_empty() {
            return Err(GameError::MissingPlayerId);
        }
        let player = world
            .player(player_id)
            .ok_or_else(|| GameError::UnknownPlayer(player_id.to_string()))?;
        let text = sanitize_chat_text(text).ok_or(GameError::EmptyMessage)?;

        self.messages.push_back(ChatMessage {
            name: player.name.clone(),
            text,
            sent_at_ms: now_ms,
        });
        while self.messages.len() > CHAT_HISTORY_LIMIT {
            self.messages.pop_front();
        }
        Ok(())
    }

    pub fn recent(&self) -> Vec<ChatMessage> {
        let skip = self.messages.len().saturating_sub(CHAT_RECENT_LIMIT);
        self.messages.iter().skip(skip).cloned().collect()
    }
}
