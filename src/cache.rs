// Single-slot cache with expiry, one per ranking endpoint

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

#[derive(Debug)]
struct Entry<T> {
    value: T,
    expires_at: Instant,
}

/// Holds the last computed value until `ttl` elapses
#[derive(Debug)]
pub struct TtlCache<T> {
    ttl: Duration,
    slot: Mutex<Option<Entry<T>>>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: Mutex::new(None),
        }
    }

    /// Cached value if it has not expired yet
    pub fn get_fresh(&self) -> Option<T> {
        self.get_fresh_at(Instant::now())
    }

    fn get_fresh_at(&self, now: Instant) -> Option<T> {
        let slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.as_ref()
            .filter(|entry| now < entry.expires_at)
            .map(|entry| entry.value.clone())
    }

    pub fn put(&self, value: T) {
        self.put_at(value, Instant::now());
    }

    fn put_at(&self, value: T, now: Instant) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(Entry {
            value,
            expires_at: now + self.ttl,
        });
    }
}
