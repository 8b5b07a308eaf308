// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::time::{Duration, Instant};

/// Queries shorter than this never hit the network.
pub const MIN_QUERY_LEN: usize = 2;

/// Quiet period a query must survive before a request fires.
pub const SETTLE: Duration = Duration::from_millis(300);

/// A search request that is due to be sent. The generation number ties any
/// eventual response back to this request; see [`SearchDebouncer::is_current`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub generation: u64,
}

#[derive(Debug, Clone)]
struct Pending {
    query: String,
    at: Instant,
}

/// Debounce policy for search-as-you-type, decoupled from any clock or I/O.
///
/// Callers feed keystrokes with their timestamps and poll [`due`] with "now";
/// a request fires only after [`SETTLE`] of quiescence, at most once per
/// settled query. Each fired request carries a generation number, and a
/// response should be applied only while its generation is still current,
/// which discards out-of-order responses for superseded queries.
///
/// [`due`]: SearchDebouncer::due
#[derive(Debug)]
pub struct SearchDebouncer {
    pending: Option<Pending>,
    generation: u64,
}

impl SearchDebouncer {
    pub fn new() -> Self {
        SearchDebouncer {
            pending: None,
            generation: 0,
        }
    }

    /// Record a keystroke. The new query supersedes any pending one and the
    /// settle timer restarts. Queries shorter than [`MIN_QUERY_LEN`] clear
    /// the pending request and invalidate whatever is in flight.
    pub fn keystroke(&mut self, query: &str, at: Instant) {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_LEN {
            self.pending = None;
            self.generation += 1;
            return;
        }
        self.pending = Some(Pending {
            query: query.to_string(),
            at,
        });
    }

    /// Fire the pending request if it has settled. Returns at most one
    /// request per settled query; the pending slot is consumed.
    pub fn due(&mut self, now: Instant) -> Option<SearchRequest> {
        let settled = self
            .pending
            .as_ref()
            .is_some_and(|p| now.duration_since(p.at) >= SETTLE);
        if !settled {
            return None;
        }
        let pending = self.pending.take()?;
        self.generation += 1;
        Some(SearchRequest {
            query: pending.query,
            generation: self.generation,
        })
    }

    /// Time left until the pending query settles, if any. Useful as a poll
    /// timeout for event loops.
    pub fn time_to_due(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|p| SETTLE.saturating_sub(now.duration_since(p.at)))
    }

    /// Whether a response for the given generation may still be applied.
    /// False once a newer request has fired or the query was cleared.
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new()
    }
}
