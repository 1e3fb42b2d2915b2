//! Envelope types for JSON frames exchanged with producers and viewers.
//!
//! Inbound frames are classified into an [`Envelope`] by
//! [`validate`](crate::validate::validate). Outbound frames are built from
//! the typed structs below and serialized with `serde_json`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::geo::Position;

/// Raw decoded JSON object.
pub type Payload = Map<String, Value>;

/// The two recognized values of the `msgType` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    /// Vehicle positions, single object inbound or array outbound.
    #[serde(rename = "Buses")]
    Buses,
    /// A viewer's new map rectangle.
    #[serde(rename = "newBounds")]
    NewBounds,
}

impl MessageKind {
    /// The literal `msgType` tag on the wire.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Buses => "Buses",
            Self::NewBounds => "newBounds",
        }
    }

    /// Look up a kind by its wire tag. Case sensitive.
    pub fn from_tag(tag: &str) -> Option<Self> {
        [Self::Buses, Self::NewBounds]
            .into_iter()
            .find(|kind| kind.tag() == tag)
    }
}

/// A frame that passed envelope validation.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// A `Buses` frame; carries the whole decoded object.
    Buses(Payload),
    /// A `newBounds` frame; carries the contents of its `data` object.
    NewBounds(Payload),
}

impl Envelope {
    /// Which message type this envelope was tagged with.
    pub const fn kind(&self) -> MessageKind {
        match self {
            Self::Buses(_) => MessageKind::Buses,
            Self::NewBounds(_) => MessageKind::NewBounds,
        }
    }
}

/// Producer to broker: a single vehicle's new position.
///
/// Note that `buses` is one object here, while [`BusesBroadcast`] carries
/// an array under the same key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionUpdate {
    /// Always [`MessageKind::Buses`].
    #[serde(rename = "msgType")]
    pub msg_type: MessageKind,
    /// The reported position.
    pub buses: Position,
}

impl PositionUpdate {
    /// Wrap a position in a producer envelope.
    pub const fn new(position: Position) -> Self {
        Self {
            msg_type: MessageKind::Buses,
            buses: position,
        }
    }

    /// Encode as a JSON text frame.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Broker to viewer: every known position inside the viewer's bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusesBroadcast {
    /// Always [`MessageKind::Buses`].
    #[serde(rename = "msgType")]
    pub msg_type: MessageKind,
    /// Positions in no particular order.
    pub buses: Vec<Position>,
}

impl BusesBroadcast {
    /// Wrap a filtered snapshot in a broadcast envelope.
    pub const fn new(buses: Vec<Position>) -> Self {
        Self {
            msg_type: MessageKind::Buses,
            buses,
        }
    }

    /// Encode as a JSON text frame.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn kind_tags_round_trip() {
        assert_eq!(MessageKind::from_tag("Buses"), Some(MessageKind::Buses));
        assert_eq!(MessageKind::from_tag("newBounds"), Some(MessageKind::NewBounds));
        assert_eq!(MessageKind::from_tag("NewBounds"), None);
        assert_eq!(MessageKind::from_tag(""), None);
    }

    #[test]
    fn producer_frame_carries_single_object() {
        let frame = PositionUpdate::new(Position::new("a-1", 55.0, 37.0, "A"))
            .to_json()
            .unwrap();
        let value: Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(value["msgType"], "Buses");
        assert!(value["buses"].is_object());
        assert_eq!(value["buses"]["busId"], "a-1");
    }

    #[test]
    fn broadcast_round_trip_preserves_positions() {
        let positions = vec![
            Position::new("a", 55.0, 37.0, "1"),
            Position::new("b", 55.5, 37.5, "2"),
            Position::new("c", 54.1, 36.2, "1"),
        ];
        let frame = BusesBroadcast::new(positions.clone()).to_json().unwrap();
        assert!(frame.contains(r#""msgType":"Buses""#));

        let decoded: BusesBroadcast = serde_json::from_str(&frame).unwrap();
        assert_eq!(decoded.msg_type, MessageKind::Buses);

        let by_id = |list: &[Position]| -> BTreeMap<String, Position> {
            list.iter().map(|p| (p.bus_id.clone(), p.clone())).collect()
        };
        assert_eq!(by_id(&decoded.buses), by_id(&positions));
    }

    #[test]
    fn empty_broadcast_is_an_empty_array() {
        let frame = BusesBroadcast::new(Vec::new()).to_json().unwrap();
        assert_eq!(frame, r#"{"msgType":"Buses","buses":[]}"#);
    }
}
