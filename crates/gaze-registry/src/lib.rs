//! Zone Registry: the authoritative, concurrent store of current [`Zone`]s.
//!
//! Grounded directly on `hotki-world`'s `WorldState`: a single
//! `parking_lot::Mutex`-guarded map, readers clone data out rather than
//! holding a reference across the lock, and `replace_all` is the one
//! operation allowed to shrink the set non-monotonically (spec.md §4.5).
#![warn(missing_docs)]

use std::collections::HashMap;

use gaze_protocol::Zone;
use parking_lot::Mutex;
use tracing::{debug, trace};

/// Concurrent store keyed by zone id.
///
/// All mutating operations serialize on a single internal lock; readers
/// take the same lock briefly and return cloned data, so no long-held
/// reference into the registry ever escapes a call (spec.md §4.5, §5).
pub struct ZoneRegistry {
    inner: Mutex<HashMap<String, Zone>>,
}

impl Default for ZoneRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ZoneRegistry {
    /// Construct an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Insert or refresh `zone`: an existing id's fields are overwritten
    /// wholesale, including `last_seen`.
    pub fn register(&self, zone: Zone) {
        trace!(zone_id = %zone.id, "registry_register");
        self.inner.lock().insert(zone.id.clone(), zone);
    }

    /// Insert or refresh each zone in `zones`.
    pub fn register_many(&self, zones: impl IntoIterator<Item = Zone>) {
        let mut guard = self.inner.lock();
        for zone in zones {
            trace!(zone_id = %zone.id, "registry_register_many");
            guard.insert(zone.id.clone(), zone);
        }
    }

    /// Atomically replace the entire set with `zones`. Ids not present in
    /// `zones` are removed. A reader observing [`ZoneRegistry::count`]
    /// immediately after this call always sees exactly the new set.
    pub fn replace_all(&self, zones: impl IntoIterator<Item = Zone>) {
        let mut guard = self.inner.lock();
        let new_map: HashMap<String, Zone> =
            zones.into_iter().map(|z| (z.id.clone(), z)).collect();
        debug!(count = new_map.len(), "registry_replace_all");
        *guard = new_map;
    }

    /// Remove a single zone by id, returning it if present.
    pub fn remove(&self, id: &str) -> Option<Zone> {
        self.inner.lock().remove(id)
    }

    /// Clone out a single zone by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Zone> {
        self.inner.lock().get(id).cloned()
    }

    /// Clone out every zone currently registered.
    #[must_use]
    pub fn all(&self) -> Vec<Zone> {
        self.inner.lock().values().cloned().collect()
    }

    /// Number of zones currently registered.
    #[must_use]
    pub fn count(&self) -> usize {
        self.inner.lock().len()
    }

    /// Case-insensitive substring match against `label`.
    #[must_use]
    pub fn find_by_label(&self, needle: &str) -> Vec<Zone> {
        let needle = needle.to_lowercase();
        self.inner
            .lock()
            .values()
            .filter(|z| z.label.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    /// All zones of a given kind.
    #[must_use]
    pub fn find_by_kind(&self, kind: gaze_protocol::ZoneKind) -> Vec<Zone> {
        self.inner
            .lock()
            .values()
            .filter(|z| z.kind == kind)
            .cloned()
            .collect()
    }

    /// The smallest zone whose bounds contain `(x, y)`; ties broken by
    /// highest confidence, then most recent `last_seen`.
    #[must_use]
    pub fn find_at_point(&self, x: f64, y: f64) -> Option<Zone> {
        self.inner
            .lock()
            .values()
            .filter(|z| z.bounds.contains(x, y))
            .min_by(|a, b| {
                a.bounds
                    .area()
                    .partial_cmp(&b.bounds.area())
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| b.confidence.partial_cmp(&a.confidence).unwrap_or(std::cmp::Ordering::Equal))
                    .then_with(|| b.last_seen.cmp(&a.last_seen))
            })
            .cloned()
    }

    /// The zone whose bounds edge is euclidean-nearest to `(x, y)`.
    #[must_use]
    pub fn nearest_to(&self, x: f64, y: f64) -> Option<Zone> {
        self.inner
            .lock()
            .values()
            .min_by(|a, b| {
                a.bounds
                    .distance_to_point(x, y)
                    .partial_cmp(&b.bounds.distance_to_point(x, y))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .cloned()
    }

    /// Remove every zone whose `last_seen` is more than `max_age_ms` behind
    /// `now_ms`, returning the removed ids.
    pub fn expire_stale(&self, now_ms: u64, max_age_ms: u64) -> Vec<String> {
        let mut guard = self.inner.lock();
        let stale: Vec<String> = guard
            .values()
            .filter(|z| now_ms.saturating_sub(z.last_seen) > max_age_ms)
            .map(|z| z.id.clone())
            .collect();
        for id in &stale {
            guard.remove(id);
        }
        if !stale.is_empty() {
            debug!(count = stale.len(), "registry_expire_stale");
        }
        stale
    }
}
