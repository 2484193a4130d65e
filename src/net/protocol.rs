//! Wire messages: a `{type, payload}` JSON envelope in both directions.
//!
//! Inbound parsing is total: malformed frames, bad payloads, and unknown
//! message types are logged and dropped, never surfaced as errors. A bad
//! frame must not be able to take the panel down or clobber good state.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::model::{Button, Layout};

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: Value,
}

#[derive(Debug, Deserialize)]
struct InitialStatePayload {
    buttons: Vec<Button>,
    layout: Layout,
}

#[derive(Debug, Deserialize)]
struct LayoutUpdatePayload {
    layout: Layout,
}

/// Inbound messages the client acts on. Layouts are already normalized
/// (validated and sorted by page index) by the time they appear here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// Full replace: button set plus layout.
    InitialState {
        buttons: Vec<Button>,
        layout: Layout,
    },
    /// Layout-only replace; the button set is unchanged.
    LayoutUpdate { layout: Layout },
}

/// Outbound messages. Press reports are fire-and-forget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ClientMessage {
    ButtonPress { button_id: String },
}

/// Parse one inbound text frame into a message, or `None` if the frame is
/// unusable for any reason.
pub fn parse_server_message(raw: &str) -> Option<ServerMessage> {
    let envelope: Envelope = match serde_json::from_str(raw) {
        Ok(envelope) => envelope,
        Err(err) => {
            warn!("discarding unparseable frame: {err}");
            return None;
        }
    };
    match envelope.kind.as_str() {
        "initial_state" => {
            let payload: InitialStatePayload = match serde_json::from_value(envelope.payload) {
                Ok(payload) => payload,
                Err(err) => {
                    warn!("discarding initial_state with bad payload: {err}");
                    return None;
                }
            };
            let layout = match payload.layout.normalize() {
                Ok(layout) => layout,
                Err(err) => {
                    warn!("discarding initial_state with invalid layout: {err}");
                    return None;
                }
            };
            Some(ServerMessage::InitialState {
                buttons: payload.buttons,
                layout,
            })
        }
        "layout_update" => {
            let payload: LayoutUpdatePayload = match serde_json::from_value(envelope.payload) {
                Ok(payload) => payload,
                Err(err) => {
                    warn!("discarding layout_update with bad payload: {err}");
                    return None;
                }
            };
            match payload.layout.normalize() {
                Ok(layout) => Some(ServerMessage::LayoutUpdate { layout }),
                Err(err) => {
                    warn!("discarding layout_update with invalid layout: {err}");
                    None
                }
            }
        }
        other => {
            info!("ignoring unknown message type '{other}'");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INITIAL_STATE: &str = r#"{
        "type": "initial_state",
        "payload": {
            "buttons": [
                {"id": "a", "name": "Alpha", "icon_path": "icons/a.png"},
                {"id": "b", "name": "Beta"}
            ],
            "layout": {
                "rows_per_page": 1,
                "cols_per_page": 2,
                "page_count": 2,
                "pages": [
                    {"page_index": 5, "grid": [["b", ""]]},
                    {"page_index": 2, "grid": [["a", "b"]]}
                ]
            }
        }
    }"#;

    #[test]
    fn test_parse_initial_state_normalizes_layout() {
        let Some(ServerMessage::InitialState { buttons, layout }) =
            parse_server_message(INITIAL_STATE)
        else {
            panic!("expected initial_state");
        };
        assert_eq!(buttons.len(), 2);
        assert_eq!(buttons[1].icon_path, "");
        // Pages arrive sorted even when wire indices are sparse.
        assert_eq!(layout.pages[0].page_index, 2);
        assert_eq!(layout.pages[1].page_index, 5);
    }

    #[test]
    fn test_parse_layout_update() {
        let raw = r#"{
            "type": "layout_update",
            "payload": {
                "layout": {
                    "rows_per_page": 1,
                    "cols_per_page": 1,
                    "page_count": 1,
                    "pages": [{"page_index": 0, "grid": [["a"]]}]
                }
            }
        }"#;
        assert!(matches!(
            parse_server_message(raw),
            Some(ServerMessage::LayoutUpdate { .. })
        ));
    }

    #[test]
    fn test_empty_payload_is_dropped() {
        assert_eq!(
            parse_server_message(r#"{"type": "initial_state", "payload": {}}"#),
            None
        );
    }

    #[test]
    fn test_invalid_layout_drops_whole_message() {
        let raw = r#"{
            "type": "layout_update",
            "payload": {
                "layout": {
                    "rows_per_page": 1,
                    "cols_per_page": 1,
                    "page_count": 3,
                    "pages": [{"page_index": 0, "grid": [["a"]]}]
                }
            }
        }"#;
        assert_eq!(parse_server_message(raw), None);
    }

    #[test]
    fn test_unknown_type_is_ignored() {
        assert_eq!(
            parse_server_message(r#"{"type": "server_gossip", "payload": {"x": 1}}"#),
            None
        );
    }

    #[test]
    fn test_garbage_frame_is_dropped() {
        assert_eq!(parse_server_message("not json at all"), None);
        assert_eq!(parse_server_message(r#"{"payload": {}}"#), None);
    }

    #[test]
    fn test_button_press_wire_shape() {
        let message = ClientMessage::ButtonPress {
            button_id: "btn_calc".into(),
        };
        let json = serde_json::to_string(&message).unwrap();
        assert_eq!(
            json,
            r#"{"type":"button_press","payload":{"button_id":"btn_calc"}}"#
        );
    }
}
