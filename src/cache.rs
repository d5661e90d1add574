//! Expiring cache in front of the item source. The cache exclusively owns all
//! cached state; callers get clones, never references into storage.
//!
//! Single-flight is structural: the top list lives behind one async mutex held
//! across the check-fetch-store sequence, and each per-id entry has its own async
//! mutex, so two callers racing on the same stale key collapse into one
//! upstream call while different keys refresh concurrently.

struct Stamped<T> {
    value: T,
    fetched_at: tokio::time::Instant,
}

impl<T> Stamped<T> {
    fn now(value: T) -> Self {
        Self {
            value,
            fetched_at: tokio::time::Instant::now(),
        }
    }
}

type Entry = std::sync::Arc<tokio::sync::Mutex<Option<Stamped<crate::hn_api::Item>>>>;

pub(crate) struct Cache<S> {
    source: S,
    time_limit: std::time::Duration,
    top: tokio::sync::Mutex<Option<Stamped<Vec<u64>>>>,
    items: std::sync::Mutex<std::collections::HashMap<u64, Entry>>,
}

impl<S: crate::hn_api::ItemSource> Cache<S> {
    pub(crate) fn new(source: S, time_limit: std::time::Duration) -> Self {
        Self {
            source,
            time_limit,
            top: tokio::sync::Mutex::new(None),
            items: std::sync::Mutex::new(std::collections::HashMap::new()),
        }
    }

    fn is_fresh(&self, stamped_at: tokio::time::Instant) -> bool {
        stamped_at.elapsed() < self.time_limit
    }

    /// The ranked id list, refreshed at most once per staleness window.
    /// Callers arriving during a refresh wait for it and read its result.
    pub(crate) async fn top_ids(&self) -> anyhow::Result<Vec<u64>> {
        let mut slot = self.top.lock().await;

        if let Some(stamped) = slot.as_ref() {
            if self.is_fresh(stamped.fetched_at) {
                return Ok(stamped.value.clone());
            }
        }

        match self.source.top_ids().await {
            Ok(ids) => {
                *slot = Some(Stamped::now(ids.clone()));
                Ok(ids)
            }
            // The stale list stays in place so the next caller retries.
            Err(e) => Err(e.context("refreshing top ids")),
        }
    }

    /// A single item, fetched through the cache. Refreshes for different ids
    /// run concurrently; refreshes for the same id are single-flighted.
    pub(crate) async fn get_item(&self, id: u64) -> anyhow::Result<crate::hn_api::Item> {
        let entry = {
            let mut items = self.items.lock().expect("item map lock poisoned");
            items.entry(id).or_default().clone()
        };

        let mut slot = entry.lock().await;

        if let Some(stamped) = slot.as_ref() {
            if self.is_fresh(stamped.fetched_at) {
                return Ok(stamped.value.clone());
            }
        }

        match self.source.item(id).await {
            Ok(item) => {
                *slot = Some(Stamped::now(item.clone()));
                Ok(item)
            }
            Err(e) => Err(e.context(format!("fetching item {}", id))),
        }
    }

    /// Re-fetches the top list and every cached item once. Failures keep the
    /// old value and are logged, never propagated.
    async fn refresh_all(&self) {
        {
            let mut slot = self.top.lock().await;
            match self.source.top_ids().await {
                Ok(ids) => *slot = Some(Stamped::now(ids)),
                Err(e) => tracing::warn!(error =? e, "Background top list refresh failed"),
            }
        }

        let entries: Vec<(u64, Entry)> = {
            let items = self.items.lock().expect("item map lock poisoned");
            items.iter().map(|(id, e)| (*id, e.clone())).collect()
        };

        for (id, entry) in entries {
            let mut slot = entry.lock().await;
            if slot.is_none() {
                continue;
            }
            match self.source.item(id).await {
                Ok(item) => *slot = Some(Stamped::now(item)),
                Err(e) => tracing::warn!(id, error =? e, "Background item refresh failed"),
            }
        }
    }
}

impl<S: crate::hn_api::ItemSource + 'static> Cache<S> {
    /// Optional background refresher. Never auto-started; the caller owns the
    /// returned handle and aborts it on shutdown.
    pub(crate) fn spawn_refresh_loop(
        self: &std::sync::Arc<Self>,
    ) -> tokio::task::JoinHandle<()> {
        let cache = std::sync::Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(cache.time_limit);
            // The first tick completes immediately; entries were just fetched.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                tracing::info!("Refreshing cached entries in the background");
                cache.refresh_all().await;
            }
        })
    }
}
