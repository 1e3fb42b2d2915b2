//! Geographic value types: vehicle positions and viewport bounds.

use serde::{Deserialize, Serialize};

/// Last known location of a single vehicle.
///
/// The `bus_id` is the identity; the registry keeps at most one
/// `Position` per id and a newer update replaces the older one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Vehicle identifier, unique across the fleet.
    #[serde(rename = "busId")]
    pub bus_id: String,
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lng: f64,
    /// Route label the vehicle is serving.
    pub route: String,
}

impl Position {
    /// Create a position record.
    pub fn new(bus_id: impl Into<String>, lat: f64, lng: f64, route: impl Into<String>) -> Self {
        Self {
            bus_id: bus_id.into(),
            lat,
            lng,
            route: route.into(),
        }
    }
}

/// A viewer's visible map rectangle.
///
/// The default value is all zeros, so a freshly connected viewer sees
/// nothing until it reports its first bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Eastern longitude edge.
    pub east_lng: f64,
    /// Northern latitude edge.
    pub north_lat: f64,
    /// Southern latitude edge.
    pub south_lat: f64,
    /// Western longitude edge.
    pub west_lng: f64,
}

impl Bounds {
    /// Whether the point lies inside the rectangle. Edges are inclusive.
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        (self.south_lat..=self.north_lat).contains(&lat)
            && (self.west_lng..=self.east_lng).contains(&lng)
    }

    /// Whether `position` lies inside the rectangle.
    pub fn contains_position(&self, position: &Position) -> bool {
        self.contains(position.lat, position.lng)
    }

    /// `true` when south is above north or west is east of east.
    ///
    /// An inverted rectangle can never contain anything.
    pub const fn is_inverted(&self) -> bool {
        self.south_lat > self.north_lat || self.west_lng > self.east_lng
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moscow() -> Bounds {
        Bounds {
            east_lng: 38.0,
            north_lat: 56.0,
            south_lat: 54.0,
            west_lng: 36.0,
        }
    }

    #[test]
    fn contains_interior_point() {
        assert!(moscow().contains(55.0, 37.0));
    }

    #[test]
    fn excludes_outside_point() {
        let bounds = moscow();
        assert!(!bounds.contains(10.0, 10.0));
        assert!(!bounds.contains(55.0, 38.5));
        assert!(!bounds.contains(53.9, 37.0));
    }

    #[test]
    fn edges_are_inclusive() {
        let bounds = moscow();
        assert!(bounds.contains(56.0, 37.0));
        assert!(bounds.contains(54.0, 37.0));
        assert!(bounds.contains(55.0, 38.0));
        assert!(bounds.contains(55.0, 36.0));
        assert!(bounds.contains(56.0, 38.0));
    }

    #[test]
    fn default_bounds_contain_nothing_useful() {
        let bounds = Bounds::default();
        assert!(!bounds.contains(55.75, 37.6));
        assert!(!bounds.is_inverted());
    }

    #[test]
    fn inverted_bounds_detected() {
        let mut bounds = moscow();
        bounds.south_lat = 57.0;
        assert!(bounds.is_inverted());
        assert!(!bounds.contains(55.0, 37.0));

        let mut bounds = moscow();
        bounds.west_lng = 39.0;
        assert!(bounds.is_inverted());
    }

    #[test]
    fn inversion_check_is_usable_in_const_context() {
        const FLIPPED: bool = Bounds {
            east_lng: 36.0,
            north_lat: 56.0,
            south_lat: 54.0,
            west_lng: 38.0,
        }
        .is_inverted();
        assert!(FLIPPED);
    }

    #[test]
    fn position_uses_camel_case_id_on_the_wire() {
        let position = Position::new("c790cc", 55.75, 37.6, "120");
        let json = serde_json::to_value(&position).unwrap_or_default();
        assert_eq!(json["busId"], "c790cc");
        assert_eq!(json["route"], "120");
        assert!(json.get("bus_id").is_none());
    }
}
