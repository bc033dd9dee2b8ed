//! Walkthrough of the basic cache operations with logging enabled.
//!
//! Run with `RUST_LOG=arena_lru=trace cargo run --example lru_usage` to see
//! eviction events.

use arena_lru::{CacheError, LruCache};
use tracing::info;

fn main() -> Result<(), CacheError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let mut cache = LruCache::try_new(3)?;

    cache.put("apple", 1);
    cache.put("banana", 2);
    cache.put("cherry", 3);
    info!(len = cache.len(), cap = cache.cap(), "filled cache");

    // apple becomes most recently used, banana is now the eviction candidate
    cache.get(&"apple");
    if let Some((key, value)) = cache.put("date", 4) {
        info!(key, value, "evicted on insert");
    }

    // peek reads without touching recency order
    info!(cherry = ?cache.peek(&"cherry"), lru = ?cache.peek_lru(), "peeked");

    if let Some(value) = cache.get_mut(&"cherry") {
        *value *= 10;
    }

    for (key, value) in &cache {
        info!(key, value, "entry (most to least recent)");
    }

    let removed = cache.evict(&"apple");
    info!(?removed, len = cache.len(), "evicted apple on request");

    let dropped = cache.resize(1);
    info!(dropped, "shrunk to one entry");

    cache.check_invariants()?;

    match LruCache::<&str, i32>::try_new(-1) {
        Ok(_) => info!("negative capacity accepted"),
        Err(err) => info!(%err, "negative capacity rejected"),
    }

    Ok(())
}
