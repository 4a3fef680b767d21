//! Process-wide read cache
//!
//! Every list and detail read is cached under a [`CacheKey`]: the resource
//! family name plus the canonical serialized parameters. Entries hold the
//! validated raw payload, so any handle asking the same question reuses the
//! same answer without another request.
//!
//! Writes go through fetch tickets. [`QueryCache::begin_fetch`] records that
//! a newer request for a key is in flight; a commit carrying a stale ticket
//! is discarded, so a slow response can never overwrite the result of a
//! fetch issued after it. The last *started* fetch wins the slot.
//!
//! Invalidation marks entries stale instead of dropping them: a stale entry
//! no longer satisfies reads directly but its value remains available to
//! handles that show previous data while refetching.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

/// Identity of one cached read
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    resource: String,
    query: String,
}

impl CacheKey {
    pub fn new(resource: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            query: query.into(),
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.query.is_empty() {
            write!(f, "{}", self.resource)
        } else {
            write!(f, "{}/{}", self.resource, self.query)
        }
    }
}

/// A cached payload together with its freshness
#[derive(Debug, Clone)]
pub struct CachedRead {
    pub value: Value,
    /// `false` once invalidated or past the configured lifetime
    pub fresh: bool,
}

/// Permission to commit one fetch result for one key
///
/// Tickets are consumed by [`QueryCache::commit`]; a ticket that has been
/// superseded by a later `begin_fetch` for the same key no longer commits.
#[derive(Debug)]
pub struct FetchTicket {
    key: CacheKey,
    serial: u64,
}

impl FetchTicket {
    pub fn key(&self) -> &CacheKey {
        &self.key
    }
}

#[derive(Debug)]
struct Slot {
    value: Option<Value>,
    stored_at: Option<Instant>,
    stale: bool,
    latest_ticket: u64,
}

impl Slot {
    fn empty() -> Self {
        Self {
            value: None,
            stored_at: None,
            stale: false,
            latest_ticket: 0,
        }
    }
}

/// Shared read cache; clones see the same entries
#[derive(Debug, Clone, Default)]
pub struct QueryCache {
    slots: Arc<RwLock<HashMap<CacheKey, Slot>>>,
    ticket_counter: Arc<AtomicU64>,
    lifetime: Option<Duration>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache whose entries stop being fresh after `lifetime`
    pub fn with_lifetime(lifetime: Duration) -> Self {
        Self {
            lifetime: Some(lifetime),
            ..Self::default()
        }
    }

    /// Look up a key; returns the stored payload and whether it is fresh
    pub fn lookup(&self, key: &CacheKey) -> Option<CachedRead> {
        let slots = self.read_slots();
        let slot = slots.get(key)?;
        let value = slot.value.clone()?;
        let expired = match (self.lifetime, slot.stored_at) {
            (Some(lifetime), Some(stored_at)) => stored_at.elapsed() >= lifetime,
            _ => false,
        };
        Some(CachedRead {
            value,
            fresh: !slot.stale && !expired,
        })
    }

    /// Announce a fetch for `key`; the returned ticket supersedes earlier ones
    pub fn begin_fetch(&self, key: &CacheKey) -> FetchTicket {
        let serial = self.ticket_counter.fetch_add(1, Ordering::Relaxed) + 1;
        let mut slots = self.write_slots();
        let slot = slots.entry(key.clone()).or_insert_with(Slot::empty);
        slot.latest_ticket = serial;
        FetchTicket {
            key: key.clone(),
            serial,
        }
    }

    /// Commit a fetched payload; returns `false` if the ticket was superseded
    pub fn commit(&self, ticket: FetchTicket, value: Value) -> bool {
        let mut slots = self.write_slots();
        let Some(slot) = slots.get_mut(&ticket.key) else {
            // cleared while in flight
            tracing::debug!(key = %ticket.key, "discarding fetch result for evicted entry");
            return false;
        };
        if slot.latest_ticket != ticket.serial {
            tracing::debug!(key = %ticket.key, "discarding superseded fetch result");
            return false;
        }
        slot.value = Some(value);
        slot.stored_at = Some(Instant::now());
        slot.stale = false;
        true
    }

    /// Mark one key stale; returns whether a payload was present
    pub fn invalidate(&self, key: &CacheKey) -> bool {
        let mut slots = self.write_slots();
        match slots.get_mut(key) {
            Some(slot) => {
                slot.stale = true;
                slot.value.is_some()
            }
            None => false,
        }
    }

    /// Mark every key of a resource family stale; returns how many held data
    pub fn invalidate_resource(&self, resource: &str) -> usize {
        let mut slots = self.write_slots();
        let mut touched = 0;
        for (key, slot) in slots.iter_mut() {
            if key.resource == resource {
                slot.stale = true;
                if slot.value.is_some() {
                    touched += 1;
                }
            }
        }
        tracing::debug!(resource, touched, "invalidated resource family");
        touched
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.write_slots().clear();
    }

    /// Number of entries currently holding a payload
    pub fn len(&self) -> usize {
        self.read_slots()
            .values()
            .filter(|slot| slot.value.is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Entries are plain data; a poisoned lock is recovered, not propagated.
    fn read_slots(&self) -> std::sync::RwLockReadGuard<'_, HashMap<CacheKey, Slot>> {
        match self.slots.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_slots(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<CacheKey, Slot>> {
        match self.slots.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
