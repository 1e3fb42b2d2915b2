//! Process-wide store of the latest known position per vehicle.
//!
//! [`PositionRegistry`] is a cheap-to-clone handle around a
//! read-write lock. Ingestion sessions write through [`PositionRegistry::upsert`];
//! viewer sessions read through [`PositionRegistry::within`]. Readers copy
//! what they need under the guard and release it before touching the
//! network, so a slow viewer never holds the lock.
//!
//! Entries are never evicted. A vehicle that stops reporting keeps its last
//! position until the process exits.

use std::collections::HashMap;
use std::sync::Arc;

use bustrack_protocol::{Bounds, Position};
use tokio::sync::RwLock;

/// Shared map of vehicle id to last known [`Position`].
#[derive(Debug, Clone, Default)]
pub struct PositionRegistry {
    positions: Arc<RwLock<HashMap<String, Position>>>,
}

impl PositionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the position for `position.bus_id`.
    ///
    /// Returns the position it replaced, if any. Concurrent writers to the
    /// same id resolve as last write wins.
    pub async fn upsert(&self, position: Position) -> Option<Position> {
        let mut positions = self.positions.write().await;
        positions.insert(position.bus_id.clone(), position)
    }

    /// Point-in-time copy of every known position.
    pub async fn snapshot(&self) -> Vec<Position> {
        let positions = self.positions.read().await;
        positions.values().cloned().collect()
    }

    /// Point-in-time copy of the positions inside `bounds`.
    pub async fn within(&self, bounds: &Bounds) -> Vec<Position> {
        let positions = self.positions.read().await;
        positions
            .values()
            .filter(|position| bounds.contains_position(position))
            .cloned()
            .collect()
    }

    /// Number of distinct vehicles seen so far.
    pub async fn len(&self) -> usize {
        self.positions.read().await.len()
    }

    /// `true` until the first position arrives.
    pub async fn is_empty(&self) -> bool {
        self.positions.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::float_cmp)]

    use super::*;

    fn moscow() -> Bounds {
        Bounds {
            east_lng: 38.0,
            north_lat: 56.0,
            south_lat: 54.0,
            west_lng: 36.0,
        }
    }

    #[tokio::test]
    async fn upsert_overwrites_same_id() {
        let registry = PositionRegistry::new();
        assert!(registry.is_empty().await);

        let first = registry.upsert(Position::new("a", 55.0, 37.0, "1")).await;
        assert!(first.is_none());

        let replaced = registry.upsert(Position::new("a", 55.5, 37.5, "1")).await;
        assert_eq!(replaced.map(|p| p.lat), Some(55.0));

        let snapshot = registry.snapshot().await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.first().map(|p| p.lat), Some(55.5));
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn within_filters_by_bounds() {
        let registry = PositionRegistry::new();
        registry.upsert(Position::new("A", 55.0, 37.0, "1")).await;
        registry.upsert(Position::new("B", 10.0, 10.0, "2")).await;
        registry.upsert(Position::new("edge", 56.0, 38.0, "3")).await;

        let mut inside: Vec<String> = registry
            .within(&moscow())
            .await
            .into_iter()
            .map(|p| p.bus_id)
            .collect();
        inside.sort();
        assert_eq!(inside, vec!["A".to_owned(), "edge".to_owned()]);
    }

    #[tokio::test]
    async fn default_bounds_see_nothing() {
        let registry = PositionRegistry::new();
        registry.upsert(Position::new("A", 55.0, 37.0, "1")).await;
        assert!(registry.within(&Bounds::default()).await.is_empty());
    }

    #[tokio::test]
    async fn snapshot_is_detached_from_later_writes() {
        let registry = PositionRegistry::new();
        registry.upsert(Position::new("A", 55.0, 37.0, "1")).await;
        let snapshot = registry.snapshot().await;

        registry.upsert(Position::new("B", 55.1, 37.1, "1")).await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(registry.len().await, 2);
    }

    #[tokio::test]
    async fn concurrent_upserts_to_distinct_ids() {
        let registry = PositionRegistry::new();
        let mut handles = Vec::new();
        for task in 0..16_u32 {
            let registry = registry.clone();
            handles.push(tokio::spawn(async move {
                for step in 0..50_u32 {
                    let lat = 54.0 + f64::from(step) / 100.0;
                    registry
                        .upsert(Position::new(format!("bus-{task}"), lat, 37.0, "r"))
                        .await;
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(registry.len().await, 16);
        assert!(registry
            .snapshot()
            .await
            .iter()
            .all(|p| (p.lat - 54.49).abs() < 1e-9));
    }
}
