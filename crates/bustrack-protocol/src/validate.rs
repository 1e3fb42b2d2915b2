//! Two-stage validation of inbound frames.
//!
//! Stage one ([`validate`]) checks the envelope: well-formed JSON object,
//! recognized `msgType`, and for `newBounds` a non-empty `data` object.
//! Stage two ([`position_from_payload`], [`bounds_from_data`]) decodes the
//! payload into a typed value once the caller knows which one it expects.
//!
//! Neither stage panics; every failure is a [`ValidationError`].

use serde_json::Value;

use crate::error::{ErrorKind, ValidationError};
use crate::geo::{Bounds, Position};
use crate::message::{Envelope, MessageKind, Payload};

/// Classify a raw text frame.
///
/// # Errors
///
/// - [`ErrorKind::InvalidPayload`] if the text is not a JSON object
/// - [`ErrorKind::MissingMessageType`] if `msgType` is absent or unknown
/// - [`ErrorKind::MissingBoundsData`] if a `newBounds` frame has no
///   non-empty `data` object
pub fn validate(text: &str) -> Result<Envelope, ValidationError> {
    let Ok(Value::Object(mut payload)) = serde_json::from_str::<Value>(text) else {
        return Err(ErrorKind::InvalidPayload.into());
    };

    let kind = payload
        .get("msgType")
        .and_then(Value::as_str)
        .and_then(MessageKind::from_tag)
        .ok_or(ErrorKind::MissingMessageType)?;

    match kind {
        MessageKind::Buses => Ok(Envelope::Buses(payload)),
        MessageKind::NewBounds => match payload.remove("data") {
            Some(Value::Object(data)) if !data.is_empty() => Ok(Envelope::NewBounds(data)),
            _ => Err(ErrorKind::MissingBoundsData.into()),
        },
    }
}

/// Decode the single position carried under `buses` in a producer frame.
///
/// # Errors
///
/// Returns [`ErrorKind::InvalidPosition`] if `buses` is missing, is an
/// array, or lacks any of `busId`, `lat`, `lng`, `route` with the right type.
pub fn position_from_payload(mut payload: Payload) -> Result<Position, ValidationError> {
    let buses = payload
        .remove("buses")
        .ok_or(ErrorKind::InvalidPosition)?;
    let position = serde_json::from_value(buses)
        .ok()
        .ok_or(ErrorKind::InvalidPosition)?;
    Ok(position)
}

/// Decode the contents of a `newBounds` frame's `data` object.
///
/// # Errors
///
/// - [`ErrorKind::MissingBoundsData`] if any of the four bounds is missing
///   or not a number
/// - [`ErrorKind::InvertedBounds`] if south is above north or west is east
///   of east
pub fn bounds_from_data(data: Payload) -> Result<Bounds, ValidationError> {
    let bounds: Bounds = serde_json::from_value(Value::Object(data))
        .ok()
        .ok_or(ErrorKind::MissingBoundsData)?;
    if bounds.is_inverted() {
        return Err(ErrorKind::InvertedBounds.into());
    }
    Ok(bounds)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::float_cmp, clippy::panic)]

    use super::*;

    fn kind_of(text: &str) -> ErrorKind {
        validate(text).unwrap_err().kind()
    }

    #[test]
    fn malformed_json_is_invalid_payload() {
        assert_eq!(kind_of("{123:112,"), ErrorKind::InvalidPayload);
        assert_eq!(kind_of(r#"{"msgType": "Buses", "buses": [}"#), ErrorKind::InvalidPayload);
        assert_eq!(kind_of(""), ErrorKind::InvalidPayload);
    }

    #[test]
    fn non_object_json_is_invalid_payload() {
        assert_eq!(kind_of("[1, 2, 3]"), ErrorKind::InvalidPayload);
        assert_eq!(kind_of("\"Buses\""), ErrorKind::InvalidPayload);
    }

    #[test]
    fn missing_or_unknown_msg_type() {
        let no_type = r#"{"data": {"east_lng": 37.0, "north_lat": 55.0, "south_lat": 55.0, "west_lng": 37.5}}"#;
        assert_eq!(kind_of(no_type), ErrorKind::MissingMessageType);

        let buses_no_type = r#"{"buses": [{"busId": "c790cc", "lat": 55.75, "lng": 37.6, "route": "120"}]}"#;
        assert_eq!(kind_of(buses_no_type), ErrorKind::MissingMessageType);

        assert_eq!(kind_of(r#"{"msgType": "Trams"}"#), ErrorKind::MissingMessageType);
        assert_eq!(kind_of(r#"{"msgType": 5}"#), ErrorKind::MissingMessageType);
    }

    #[test]
    fn new_bounds_without_data() {
        assert_eq!(
            kind_of(r#"{"msgType":"newBounds","bogus":{}}"#),
            ErrorKind::MissingBoundsData
        );
        assert_eq!(
            kind_of(r#"{"msgType":"newBounds","data":{}}"#),
            ErrorKind::MissingBoundsData
        );
        assert_eq!(
            kind_of(r#"{"msgType":"newBounds","data":[1]}"#),
            ErrorKind::MissingBoundsData
        );
    }

    #[test]
    fn new_bounds_unwraps_data() {
        let text = r#"{"msgType":"newBounds","data":{"east_lng":38,"north_lat":56,"south_lat":54,"west_lng":36}}"#;
        let Envelope::NewBounds(data) = validate(text).unwrap() else {
            panic!("expected newBounds envelope");
        };
        assert!(data.get("msgType").is_none());
        assert_eq!(data.len(), 4);

        let bounds = bounds_from_data(data).unwrap();
        assert_eq!(bounds.north_lat, 56.0);
        assert_eq!(bounds.west_lng, 36.0);
    }

    #[test]
    fn buses_payload_returned_whole() {
        let text = r#"{"msgType":"Buses","buses":{"busId":"a","lat":55.0,"lng":37.0,"route":"7"}}"#;
        let envelope = validate(text).unwrap();
        assert_eq!(envelope.kind(), MessageKind::Buses);
        let Envelope::Buses(payload) = envelope else {
            panic!("expected Buses envelope");
        };
        assert_eq!(payload["msgType"], "Buses");

        let position = position_from_payload(payload).unwrap();
        assert_eq!(position, Position::new("a", 55.0, 37.0, "7"));
    }

    #[test]
    fn position_decoding_rejects_incomplete_or_array_payloads() {
        let cases = [
            r#"{"msgType":"Buses"}"#,
            r#"{"msgType":"Buses","buses":{"busId":"a","lat":55.0,"route":"7"}}"#,
            r#"{"msgType":"Buses","buses":{"busId":"a","lat":"55","lng":37.0,"route":"7"}}"#,
            r#"{"msgType":"Buses","buses":[{"busId":"a","lat":55.0,"lng":37.0,"route":"7"}]}"#,
        ];
        for text in cases {
            let Envelope::Buses(payload) = validate(text).unwrap() else {
                panic!("expected Buses envelope for {text}");
            };
            assert_eq!(
                position_from_payload(payload).unwrap_err().kind(),
                ErrorKind::InvalidPosition,
                "{text}"
            );
        }
    }

    #[test]
    fn bounds_missing_field_is_missing_data() {
        let text = r#"{"msgType":"newBounds","data":{"east_lng":38,"north_lat":56,"south_lat":54}}"#;
        let Envelope::NewBounds(data) = validate(text).unwrap() else {
            panic!("expected newBounds envelope");
        };
        assert_eq!(
            bounds_from_data(data).unwrap_err().kind(),
            ErrorKind::MissingBoundsData
        );
    }

    #[test]
    fn inverted_bounds_rejected() {
        let text = r#"{"msgType":"newBounds","data":{"east_lng":38,"north_lat":54,"south_lat":56,"west_lng":36}}"#;
        let Envelope::NewBounds(data) = validate(text).unwrap() else {
            panic!("expected newBounds envelope");
        };
        assert_eq!(
            bounds_from_data(data).unwrap_err().kind(),
            ErrorKind::InvertedBounds
        );
    }

    #[test]
    fn degenerate_bounds_accepted() {
        let text = r#"{"msgType":"newBounds","data":{"east_lng":37.0,"north_lat":55.0,"south_lat":55.0,"west_lng":37.0}}"#;
        let Envelope::NewBounds(data) = validate(text).unwrap() else {
            panic!("expected newBounds envelope");
        };
        let bounds = bounds_from_data(data).unwrap();
        assert!(bounds.contains(55.0, 37.0));
    }
}
