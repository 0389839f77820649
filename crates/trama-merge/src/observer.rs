/// Hook into row mutations, called after the store confirms each one.
///
/// The engine guarantees a call for every row it actually changed -- one
/// `on_persisted` per upsert (including the legacy-enrichment re-write) and
/// one `on_deleted` per removed row. Cache invalidation hangs off this seam
/// so the engine itself never holds a cache handle.
pub trait WriteObserver: Send + Sync {
    /// A row was inserted or updated.
    fn on_persisted(&self, page_id: &str, json_key: &str) {
        let _ = (page_id, json_key);
    }

    /// A row was removed.
    fn on_deleted(&self, page_id: &str, json_key: &str) {
        let _ = (page_id, json_key);
    }
}

/// Observer that ignores every event. Useful for tests and offline tools.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpObserver;

impl WriteObserver for NoOpObserver {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_observer_accepts_events() {
        let observer = NoOpObserver;
        observer.on_persisted("home", "a");
        observer.on_deleted("home", "a");
    }
}
