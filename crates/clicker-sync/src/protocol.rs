//! Wire protocol
//!
//! Every frame is one JSON object of the form `{ "event": ..., "data": ... }`.
//! Clients send [`Action`]s; the server sends [`ServerMessage`]s.

use crate::delta::StateDelta;
use crate::view::GameStateView;
use crate::Result;
use clicker_core::{Action, Event, Reply};
use serde::{Deserialize, Serialize};

/// Payload of a `gameStateUpdate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StateUpdate {
    /// Replace the cached state (after reconciling)
    Full(GameStateView),
    /// Merge into the cached state
    Delta(StateDelta),
}

/// Server frames that are neither events nor replies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum SyncMessage {
    GameStateUpdate(StateUpdate),
    Notification { message: String },
}

/// Any frame the server sends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServerMessage {
    Sync(SyncMessage),
    Event(Event),
    Reply(Reply),
}

impl ServerMessage {
    pub fn full(view: GameStateView) -> Self {
        ServerMessage::Sync(SyncMessage::GameStateUpdate(StateUpdate::Full(view)))
    }

    pub fn delta(delta: StateDelta) -> Self {
        ServerMessage::Sync(SyncMessage::GameStateUpdate(StateUpdate::Delta(delta)))
    }

    pub fn notification(message: impl Into<String>) -> Self {
        ServerMessage::Sync(SyncMessage::Notification {
            message: message.into(),
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Decode a client frame
pub fn decode_action(text: &str) -> Result<Action> {
    Ok(serde_json::from_str(text)?)
}

/// Encode a client frame
pub fn encode_action(action: &Action) -> Result<String> {
    Ok(serde_json::to_string(action)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clicker_core::{BossResult, ItemId, TeamState};
    use serde_json::json;

    #[test]
    fn test_client_frames() {
        let action = decode_action(r#"{"event":"forgeItem","data":{"itemId":3}}"#).unwrap();
        assert_eq!(action, Action::ForgeItem { item_id: ItemId(3) });

        let action = decode_action(r#"{"event":"mergeItems","data":{"itemId1":1,"itemId2":2}}"#).unwrap();
        assert_eq!(
            action,
            Action::MergeItems {
                item_id1: ItemId(1),
                item_id2: ItemId(2)
            }
        );

        assert_eq!(
            decode_action(r#"{"event":"surrenderBoss"}"#).unwrap(),
            Action::SurrenderBoss
        );
        assert!(decode_action(r#"{"event":"hack"}"#).is_err());
    }

    #[test]
    fn test_delta_shape() {
        let team = TeamState::new(100.0);
        let text = ServerMessage::delta(StateDelta::from_team(&team)).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["event"], "gameStateUpdate");
        assert_eq!(value["data"]["type"], "delta");
        assert_eq!(value["data"]["progressRemaining"], 100.0);
    }

    #[test]
    fn test_full_state_round_trip() {
        let mut team = TeamState::new(100.0);
        team.add_player(clicker_core::PlayerId(1), "ana", 10).unwrap();
        team.earn(12.5);
        let msg = ServerMessage::full(GameStateView::from_team(&team));

        let back = ServerMessage::from_json(&msg.to_json().unwrap()).unwrap();
        assert_eq!(back, msg);
    }

    #[test]
    fn test_event_and_reply_frames() {
        let result = json!({
            "event": "bossResult",
            "data": { "victory": false, "surrendered": true, "penalty": 50 }
        });
        let msg: ServerMessage = serde_json::from_value(result).unwrap();
        assert_eq!(
            msg,
            ServerMessage::Event(Event::BossResult(BossResult::Defeat {
                victory: false,
                surrendered: true,
                penalty: 50
            }))
        );

        let reply = json!({
            "event": "discardResult",
            "data": { "success": true, "message": "Discarded Oak Staff" }
        });
        let msg: ServerMessage = serde_json::from_value(reply).unwrap();
        assert!(matches!(msg, ServerMessage::Reply(Reply::DiscardResult { success: true, .. })));

        let note = ServerMessage::notification("hi").to_json().unwrap();
        assert_eq!(note, r#"{"event":"notification","data":{"message":"hi"}}"#);
    }
}
