//! Grouped, TTL-bounded suggestion store

use super::clock::{Clock, SystemClock};
use super::config::SuggestConfig;
use super::metrics::SUGGEST_METRICS;
use super::similarity::PrefixMatcher;
use crate::error::{AppError, Result};
use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// A ranked suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub text: String,
    pub score: f64,
}

/// Store size snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestStats {
    pub groups: usize,
    pub entries: usize,
}

#[derive(Debug, Clone, Copy)]
struct SuggestionEntry {
    inserted_at: DateTime<Utc>,
    /// Insertion order across the whole store
    seq: u64,
}

type GroupEntries = Arc<DashMap<String, SuggestionEntry>>;

static STORE_IDS: AtomicU64 = AtomicU64::new(0);

/// Previously observed query strings, scoped per group.
///
/// `index` and `suggest` may be called concurrently from any number of
/// threads. Writes to the same `(text, group)` key are serialized and the
/// last one wins; `cleanup` never removes an entry written after its sweep
/// started.
pub struct SuggestionStore {
    groups: DashMap<String, GroupEntries>,
    config: SuggestConfig,
    clock: Arc<dyn Clock>,
    sequence: AtomicU64,
    metrics_label: String,
}

impl SuggestionStore {
    pub fn new(config: SuggestConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Store using `clock` as its time source
    pub fn with_clock(config: SuggestConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.check()?;
        Ok(Self {
            groups: DashMap::new(),
            config,
            clock,
            sequence: AtomicU64::new(0),
            metrics_label: format!("store-{}", STORE_IDS.fetch_add(1, Ordering::Relaxed)),
        })
    }

    pub fn config(&self) -> &SuggestConfig {
        &self.config
    }

    /// `store` label of this store's entry gauge
    pub fn metrics_label(&self) -> &str {
        &self.metrics_label
    }

    /// Oldest insertion time still alive at `now`; `None` when nothing can
    /// have expired yet
    fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        TimeDelta::try_seconds(self.config.ttl_secs).and_then(|ttl| now.checked_sub_signed(ttl))
    }

    /// Insert or refresh `text` in `group`, stamped with the current time
    pub fn index(&self, text: &str, group: &str) -> Result<()> {
        let text = text.trim();
        let group = group.trim();
        if text.is_empty() {
            return Err(AppError::invalid_argument("suggestion text must not be blank"));
        }
        if group.is_empty() {
            return Err(AppError::invalid_argument("suggestion group must not be blank"));
        }

        let entry = SuggestionEntry {
            inserted_at: self.clock.now(),
            seq: self.sequence.fetch_add(1, Ordering::SeqCst),
        };

        // The outer guard is held while inserting so a concurrent cleanup
        // cannot drop the group map between lookup and insert.
        let entries = self.groups.entry(group.to_string()).or_default();
        let previous = entries.insert(text.to_string(), entry);
        drop(entries);

        SUGGEST_METRICS.indexed_total.inc();
        if previous.is_none() {
            SUGGEST_METRICS
                .entries
                .with_label_values(&[self.metrics_label.as_str()])
                .inc();
        }
        Ok(())
    }

    /// Up to `size` distinct texts in `group` matching `prefix`, best first
    pub fn suggest(&self, prefix: &str, group: &str, size: Option<usize>) -> Vec<Suggestion> {
        self.suggest_in(prefix, &[group], size)
    }

    /// Like [`SuggestionStore::suggest`] across several groups.
    ///
    /// Candidates are taken in insertion order, then stably sorted by score,
    /// so equal scores keep insertion order. A text found more than once is
    /// reported at its first position.
    pub fn suggest_in(&self, prefix: &str, groups: &[&str], size: Option<usize>) -> Vec<Suggestion> {
        let size = self.config.effective_size(size);
        if prefix.trim().is_empty() || size == 0 {
            return Vec::new();
        }

        let matcher = PrefixMatcher::new(
            prefix,
            self.config.max_edits,
            self.config.fuzzy_min_length,
            self.config.similarity,
        );
        let cutoff = self.cutoff(self.clock.now());

        let mut candidates: Vec<(u64, Suggestion)> = Vec::new();
        for group in groups {
            let Some(entries) = self.group_entries(group.trim()) else {
                continue;
            };
            for item in entries.iter() {
                let entry = item.value();
                if cutoff.is_some_and(|cutoff| entry.inserted_at < cutoff) {
                    continue;
                }
                if let Some(score) = matcher.score(item.key()) {
                    candidates.push((
                        entry.seq,
                        Suggestion {
                            text: item.key().clone(),
                            score,
                        },
                    ));
                }
            }
        }

        candidates.sort_by_key(|(seq, _)| *seq);
        let mut ranked: Vec<Suggestion> = candidates.into_iter().map(|(_, s)| s).collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

        let mut seen = HashSet::new();
        ranked.retain(|suggestion| seen.insert(suggestion.text.clone()));
        ranked.truncate(size);

        SUGGEST_METRICS.record_lookup(ranked.len());
        debug!(
            prefix,
            groups = groups.len(),
            size,
            hits = ranked.len(),
            "suggestion lookup"
        );
        ranked
    }

    fn group_entries(&self, group: &str) -> Option<GroupEntries> {
        self.groups.get(group).map(|entries| Arc::clone(entries.value()))
    }

    /// Remove every entry older than the TTL and drop emptied groups.
    ///
    /// Returns the number of removed entries.
    pub fn cleanup(&self) -> usize {
        let started = Instant::now();
        let cutoff = self.cutoff(self.clock.now());

        let mut removed = 0;
        if let Some(cutoff) = cutoff {
            let names: Vec<String> = self.groups.iter().map(|g| g.key().clone()).collect();
            for name in names {
                let Some(entries) = self.group_entries(&name) else {
                    continue;
                };
                let before = entries.len();
                entries.retain(|_, entry| entry.inserted_at >= cutoff);
                removed += before.saturating_sub(entries.len());

                self.groups.remove_if(&name, |_, entries| entries.is_empty());
            }
        }

        let stats = self.stats();
        SUGGEST_METRICS.record_cleanup(
            &self.metrics_label,
            removed,
            stats.entries,
            started.elapsed().as_secs_f64(),
        );
        info!(
            removed,
            groups = stats.groups,
            entries = stats.entries,
            cutoff = ?cutoff,
            "suggestion cleanup finished"
        );
        removed
    }

    pub fn stats(&self) -> SuggestStats {
        let mut stats = SuggestStats {
            groups: 0,
            entries: 0,
        };
        for group in self.groups.iter() {
            stats.groups += 1;
            stats.entries += group.value().len();
        }
        stats
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl std::fmt::Debug for SuggestionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuggestionStore")
            .field("config", &self.config)
            .field("stats", &self.stats())
            .finish()
    }
}

impl Drop for SuggestionStore {
    fn drop(&mut self) {
        SUGGEST_METRICS.forget_store(&self.metrics_label);
    }
}
