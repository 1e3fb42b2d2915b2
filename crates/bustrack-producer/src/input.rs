//! Newline-delimited position input for the producer binary.
//!
//! Each non-blank line is either a bare position object
//! (`{"busId": .., "lat": .., "lng": .., "route": ..}`) or a complete
//! producer frame (`{"msgType": "Buses", "buses": {..}}`).

use bustrack_protocol::{Position, PositionUpdate};

/// Parse one input line.
///
/// Returns `Ok(None)` for blank lines.
///
/// # Errors
///
/// Returns the bare-position decode error if the line is neither form.
pub fn parse_position_line(line: &str) -> Result<Option<Position>, serde_json::Error> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    if let Ok(update) = serde_json::from_str::<PositionUpdate>(line) {
        return Ok(Some(update.buses));
    }
    serde_json::from_str::<Position>(line).map(Some)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn bare_position() {
        let line = r#"{"busId":"c790cc","lat":55.75,"lng":37.6,"route":"120"}"#;
        assert_eq!(
            parse_position_line(line).unwrap(),
            Some(Position::new("c790cc", 55.75, 37.6, "120"))
        );
    }

    #[test]
    fn full_producer_frame() {
        let line = r#"{"msgType":"Buses","buses":{"busId":"120-0","lat":55.7,"lng":37.5,"route":"120"}}"#;
        assert_eq!(
            parse_position_line(line).unwrap(),
            Some(Position::new("120-0", 55.7, 37.5, "120"))
        );
    }

    #[test]
    fn blank_lines_skipped() {
        assert_eq!(parse_position_line("   ").unwrap(), None);
        assert_eq!(parse_position_line("").unwrap(), None);
    }

    #[test]
    fn garbage_rejected() {
        assert!(parse_position_line("{123:112,").is_err());
        assert!(parse_position_line(r#"{"busId":"a"}"#).is_err());
    }
}
