// src/application/query_cache.rs
//
// Keyed cache of list results. The cache never performs I/O itself: `read` hands
// out a `FetchTicket` when a request is needed and `complete` applies the result.
// Each key carries a generation; a completion whose ticket generation no longer
// matches is dropped, so a slow response cannot overwrite newer state.
use crate::domain::DomainError;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::debug;

pub const NOTES_NAMESPACE: &str = "notes";

/// Address of one cached result: namespace plus (trimmed search, page).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    namespace: &'static str,
    search: String,
    page: u32,
}

impl QueryKey {
    pub fn notes(search: &str, page: u32) -> Self {
        Self {
            namespace: NOTES_NAMESPACE,
            search: search.trim().to_string(),
            page: page.max(1),
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn page(&self) -> u32 {
        self.page
    }
}

/// Permission to perform one network fetch for `key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    key: QueryKey,
    generation: u64,
}

impl FetchTicket {
    pub fn key(&self) -> &QueryKey {
        &self.key
    }
}

struct CacheEntry<T> {
    data: Option<T>,
    error: Option<DomainError>,
    fetched_at: Option<Instant>,
    invalidated: bool,
    // when the last fetch failed; re-reads of the same key do not retry until the
    // failure ages past the stale window or the key is revisited or refetched
    failed_at: Option<Instant>,
    last_read: Option<Instant>,
    generation: u64,
    in_flight: bool,
}

impl<T> Default for CacheEntry<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            fetched_at: None,
            invalidated: false,
            failed_at: None,
            last_read: None,
            generation: 0,
            in_flight: false,
        }
    }
}

impl<T: Clone> CacheEntry<T> {
    fn is_fresh(&self, now: Instant, stale_time: Duration) -> bool {
        !self.invalidated
            && self
                .fetched_at
                .is_some_and(|at| now.saturating_duration_since(at) < stale_time)
    }

    fn is_retry_blocked(&self, now: Instant, stale_time: Duration) -> bool {
        self.failed_at
            .is_some_and(|at| now.saturating_duration_since(at) < stale_time)
    }

    /// Unused for a full stale window and not waiting on a response.
    fn is_evictable(&self, now: Instant, stale_time: Duration) -> bool {
        !self.in_flight
            && self
                .last_read
                .map_or(true, |at| now.saturating_duration_since(at) >= stale_time)
    }

    fn snapshot(&self, now: Instant, stale_time: Duration) -> CachedQuery<T> {
        CachedQuery {
            data: self.data.clone(),
            error: self.error.clone(),
            is_fetching: self.in_flight,
            is_fresh: self.is_fresh(now, stale_time),
        }
    }
}

/// What the cache holds for a key at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedQuery<T> {
    pub data: Option<T>,
    pub error: Option<DomainError>,
    pub is_fetching: bool,
    pub is_fresh: bool,
}

/// Result of [`QueryCache::read`]. When `fetch` is set the caller owns the request.
#[derive(Debug)]
pub struct Read<T> {
    pub state: CachedQuery<T>,
    pub fetch: Option<FetchTicket>,
}

pub struct QueryCache<T> {
    entries: HashMap<QueryKey, CacheEntry<T>>,
    stale_time: Duration,
    // shared by all keys so an evicted and recreated entry never reuses a generation
    next_generation: u64,
}

impl<T: Clone> QueryCache<T> {
    pub fn new(stale_time: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            stale_time,
            next_generation: 0,
        }
    }

    /// Read `key`, issuing a ticket when the entry is missing, stale or invalidated
    /// and no request for it is already in flight. Stale data is still returned.
    /// Other keys left unread for a stale window are dropped.
    pub fn read(&mut self, key: &QueryKey, now: Instant) -> Read<T> {
        let stale_time = self.stale_time;
        self.evict_unused(key, now);
        let entry = self.entries.entry(key.clone()).or_default();
        entry.last_read = Some(now);

        let fetch = if entry.in_flight
            || entry.is_retry_blocked(now, stale_time)
            || entry.is_fresh(now, stale_time)
        {
            None
        } else {
            self.next_generation += 1;
            entry.generation = self.next_generation;
            entry.in_flight = true;
            debug!(?key, generation = entry.generation, "Issuing fetch ticket");
            Some(FetchTicket {
                key: key.clone(),
                generation: entry.generation,
            })
        };

        Read {
            state: entry.snapshot(now, stale_time),
            fetch,
        }
    }

    fn evict_unused(&mut self, keep: &QueryKey, now: Instant) {
        let stale_time = self.stale_time;
        let before = self.entries.len();
        self.entries
            .retain(|key, entry| key == keep || !entry.is_evictable(now, stale_time));
        let evicted = before - self.entries.len();
        if evicted > 0 {
            debug!(evicted, remaining = self.entries.len(), "Evicted unused cache entries");
        }
    }

    /// The key became the observed one again (after another key was shown). A
    /// previous failure no longer holds back a fetch.
    pub fn mark_visited(&mut self, key: &QueryKey) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.failed_at = None;
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }

    /// Look at an entry without side effects.
    #[cfg(test)]
    fn peek(&self, key: &QueryKey, now: Instant) -> Option<CachedQuery<T>> {
        self.entries
            .get(key)
            .map(|entry| entry.snapshot(now, self.stale_time))
    }

    /// Apply the outcome of a ticket. Returns false when the ticket was superseded.
    pub fn complete(
        &mut self,
        ticket: &FetchTicket,
        result: Result<T, DomainError>,
        now: Instant,
    ) -> bool {
        let Some(entry) = self.entries.get_mut(&ticket.key) else {
            return false;
        };
        if entry.generation != ticket.generation {
            debug!(
                key = ?ticket.key,
                ticket = ticket.generation,
                current = entry.generation,
                "Discarding superseded response"
            );
            return false;
        }

        entry.in_flight = false;
        match result {
            Ok(data) => {
                entry.data = Some(data);
                entry.error = None;
                entry.fetched_at = Some(now);
                entry.invalidated = false;
                entry.failed_at = None;
            }
            Err(err) => {
                debug!(key = ?ticket.key, %err, "Fetch failed; keeping last good data");
                entry.error = Some(err);
                entry.failed_at = Some(now);
            }
        }
        true
    }

    /// Mark every entry of `namespace` stale. Responses already on the wire for those
    /// keys will be ignored. Returns how many entries were touched.
    pub fn invalidate(&mut self, namespace: &str) -> usize {
        let mut touched = 0;
        for (key, entry) in self.entries.iter_mut() {
            if key.namespace != namespace {
                continue;
            }
            entry.invalidated = true;
            entry.failed_at = None;
            entry.in_flight = false;
            self.next_generation += 1;
            entry.generation = self.next_generation;
            touched += 1;
        }
        debug!(namespace, touched, "Invalidated cache entries");
        touched
    }

    /// Manual retry for a single key: the next read fetches even after a failure.
    pub fn refetch(&mut self, key: &QueryKey) {
        if let Some(entry) = self.entries.get_mut(key) {
            if !entry.in_flight {
                entry.invalidated = true;
                entry.failed_at = None;
            }
        }
    }
}

/// Snapshot handed to the view, after the keep-previous-data policy is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState<T> {
    pub data: Option<T>,
    /// `data` belongs to an earlier key and is shown until the current key resolves.
    pub is_placeholder: bool,
    /// Fetching with nothing to show yet.
    pub is_loading: bool,
    pub is_fetching: bool,
    pub error: Option<DomainError>,
}

/// Remembers the last successful result across key changes.
pub struct QueryObserver<T> {
    last_success: Option<T>,
}

impl<T: Clone> QueryObserver<T> {
    pub fn new() -> Self {
        Self { last_success: None }
    }

    pub fn observe(&mut self, cached: CachedQuery<T>) -> QueryState<T> {
        if let Some(data) = cached.data {
            self.last_success = Some(data.clone());
            return QueryState {
                data: Some(data),
                is_placeholder: false,
                is_loading: false,
                is_fetching: cached.is_fetching,
                error: cached.error,
            };
        }

        // an error on a key with no data of its own replaces the placeholder
        let placeholder = if cached.error.is_none() {
            self.last_success.clone()
        } else {
            None
        };
        let is_placeholder = placeholder.is_some();

        QueryState {
            data: placeholder,
            is_placeholder,
            is_loading: cached.is_fetching && !is_placeholder,
            is_fetching: cached.is_fetching,
            error: cached.error,
        }
    }
}

impl<T: Clone> Default for QueryObserver<T> {
    fn default() -> Self {
        Self::new()
    }
}
