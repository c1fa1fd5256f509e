//! Bounded in-memory cache backed by moka

use moka::future::Cache as MokaCache;
use std::hash::Hash;
use tracing::debug;

/// Number of entries kept when no capacity is configured.
pub const DEFAULT_CAPACITY: usize = 64;

/// Bounded cache shared between tasks.
///
/// Once the capacity is reached moka's admission policy decides which
/// entries stay; the exact victim is not predictable.
#[derive(Clone)]
pub struct Cache<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    inner: MokaCache<K, V>,
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + std::fmt::Debug + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// A capacity of zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: MokaCache::builder()
                .max_capacity(capacity.max(1) as u64)
                .build(),
        }
    }

    pub async fn get(&self, key: &K) -> Option<V> {
        let value = self.inner.get(key).await;
        if value.is_some() {
            debug!("Cache HIT for key: {:?}", key);
        } else {
            debug!("Cache MISS for key: {:?}", key);
        }
        value
    }

    pub async fn put(&self, key: K, value: V) {
        debug!("Cache PUT for key: {:?}", key);
        self.inner.insert(key, value).await;
    }

    /// Exact entry count; flushes moka's pending maintenance first.
    pub async fn len(&self) -> usize {
        self.inner.run_pending_tasks().await;
        self.inner.entry_count() as usize
    }

    pub async fn clear(&self) {
        self.inner.invalidate_all();
        self.inner.run_pending_tasks().await;
        debug!("Cache CLEAR");
    }
}

impl<K, V> Default for Cache<K, V>
where
    K: Eq + Hash + std::fmt::Debug + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
