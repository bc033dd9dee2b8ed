//! Cache Metrics Demonstration
//!
//! Runs a small workload against a capacity-3 cache and prints the metrics
//! map. Metric names come out in the same order on every run.

use arena_lru::{config::LruCacheConfig, metrics::CacheMetrics, LruCache};
use std::collections::BTreeMap;

fn main() {
    println!("Cache Metrics Demonstration");
    println!("===========================\n");

    let config = LruCacheConfig::new(3);
    println!("Workload: insert 3 → access pattern → insert 2 more → evict 1");
    println!("Capacity: {} items\n", config.capacity());

    let cache = run_workload(config);
    display_metrics(&cache);
    demonstrate_deterministic_ordering(&cache);
}

fn run_workload(config: LruCacheConfig) -> LruCache<&'static str, i32> {
    let mut cache = LruCache::init(config, None);

    cache.put("apple", 1);
    cache.put("banana", 2);
    cache.put("cherry", 3);

    // apple becomes most recently used
    cache.get(&"apple");
    cache.get(&"apple");
    cache.get(&"banana");

    // misses
    cache.get(&"fig");
    cache.get(&"grape");

    // update in place, then two evicting inserts
    cache.put("banana", 20);
    cache.put("date", 4);
    cache.put("elderberry", 5);

    cache.evict(&"date");
    cache.resize(1);

    cache
}

fn display_metrics(cache: &dyn CacheMetrics) {
    println!("{} metrics:", cache.algorithm_name());
    for (name, value) in cache.metrics() {
        if name.ends_with("rate") {
            println!("  {name:<14} {value:.3}");
        } else {
            println!("  {name:<14} {value}");
        }
    }
    println!();
}

fn demonstrate_deterministic_ordering(cache: &dyn CacheMetrics) {
    let first: BTreeMap<String, f64> = cache.metrics();
    let second: BTreeMap<String, f64> = cache.metrics();
    let names: Vec<&String> = first.keys().collect();
    println!("Metric order: {names:?}");
    println!("Identical across calls: {}", first.keys().eq(second.keys()));
}
