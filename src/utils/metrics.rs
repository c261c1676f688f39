use std::sync::atomic::{AtomicU64, Ordering};

static LOOKUPS_TOTAL: AtomicU64 = AtomicU64::new(0);
static CACHE_HITS_TOTAL: AtomicU64 = AtomicU64::new(0);
static LABEL_FETCHES_TOTAL: AtomicU64 = AtomicU64::new(0);
static NOT_FOUND_TOTAL: AtomicU64 = AtomicU64::new(0);

/// How a single lookup ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome {
    CacheHit,
    Fetched,
    NotFound,
}

pub fn record_lookup(outcome: LookupOutcome) {
    LOOKUPS_TOTAL.fetch_add(1, Ordering::Relaxed);
    match outcome {
        LookupOutcome::CacheHit => CACHE_HITS_TOTAL.fetch_add(1, Ordering::Relaxed),
        LookupOutcome::Fetched => LABEL_FETCHES_TOTAL.fetch_add(1, Ordering::Relaxed),
        LookupOutcome::NotFound => NOT_FOUND_TOTAL.fetch_add(1, Ordering::Relaxed),
    };
}

#[derive(Debug, Clone, Copy)]
pub struct LookupCounters {
    pub lookups: u64,
    pub cache_hits: u64,
    pub label_fetches: u64,
    pub not_found: u64,
}

pub fn snapshot() -> LookupCounters {
    LookupCounters {
        lookups: LOOKUPS_TOTAL.load(Ordering::Relaxed),
        cache_hits: CACHE_HITS_TOTAL.load(Ordering::Relaxed),
        label_fetches: LABEL_FETCHES_TOTAL.load(Ordering::Relaxed),
        not_found: NOT_FOUND_TOTAL.load(Ordering::Relaxed),
    }
}
