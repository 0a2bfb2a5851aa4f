//! Scan statistics and the in-flight operation gauge
//!
//! The traversal swallows failures by design — one bad listing must not
//! abort its siblings. These counters are the observable record of
//! everything that was swallowed or skipped, so hosts and tests can see it
//! without the control flow changing.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Counters for one service instance's scans.
///
/// All counters are cumulative across scans. The in-flight gauge counts
/// spawned listing/resolution tasks that have not yet finished; quiescence
/// (gauge at zero) is the traversal's only notion of "done".
#[derive(Debug, Default)]
pub struct ScanStats {
    directories_listed: AtomicU64,
    audio_files_found: AtomicU64,
    entries_skipped: AtomicU64,
    listing_failures: AtomicU64,
    resolution_failures: AtomicU64,
    tracks_dispatched: AtomicU64,
    tags_read: AtomicU64,
    tag_failures: AtomicU64,
    in_flight: AtomicUsize,
    idle: Notify,
}

impl ScanStats {
    pub(crate) fn record_directory_listed(&self) {
        self.directories_listed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_audio_file_found(&self) {
        self.audio_files_found.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_entry_skipped(&self) {
        self.entries_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_listing_failure(&self) {
        self.listing_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_resolution_failure(&self) {
        self.resolution_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_track_dispatched(&self) {
        self.tracks_dispatched.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_tags_read(&self) {
        self.tags_read.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_tag_failure(&self) {
        self.tag_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Register the start of one asynchronous operation.
    ///
    /// The returned guard decrements the gauge when dropped, so the count is
    /// released exactly once however the task ends.
    pub(crate) fn operation_started(self: &Arc<Self>) -> OperationGuard {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        OperationGuard {
            stats: Arc::clone(self),
        }
    }

    /// Number of operations currently in flight.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Wait until no operations are in flight.
    ///
    /// Returns immediately if nothing is running. New operations may start
    /// after this returns; it observes a moment of quiescence, not an end
    /// state.
    pub async fn wait_until_idle(&self) {
        loop {
            let mut notified = std::pin::pin!(self.idle.notified());
            // Register before checking, so a final decrement between the
            // check and the await cannot be missed.
            notified.as_mut().enable();
            if self.in_flight() == 0 {
                return;
            }
            notified.await;
        }
    }

    /// Current counter values.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            directories_listed: self.directories_listed.load(Ordering::Relaxed),
            audio_files_found: self.audio_files_found.load(Ordering::Relaxed),
            entries_skipped: self.entries_skipped.load(Ordering::Relaxed),
            listing_failures: self.listing_failures.load(Ordering::Relaxed),
            resolution_failures: self.resolution_failures.load(Ordering::Relaxed),
            tracks_dispatched: self.tracks_dispatched.load(Ordering::Relaxed),
            tags_read: self.tags_read.load(Ordering::Relaxed),
            tag_failures: self.tag_failures.load(Ordering::Relaxed),
            in_flight: self.in_flight(),
        }
    }
}

/// Guard for one in-flight operation; releases the gauge on drop.
pub struct OperationGuard {
    stats: Arc<ScanStats>,
}

impl Drop for OperationGuard {
    fn drop(&mut self) {
        if self.stats.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.stats.idle.notify_waiters();
        }
    }
}

/// Point-in-time view of [`ScanStats`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Listings fetched and parsed successfully
    pub directories_listed: u64,
    /// File entries that passed the MIME filter
    pub audio_files_found: u64,
    /// File entries discarded for an unsupported MIME type
    pub entries_skipped: u64,
    /// Listings abandoned on transport or parse failure
    pub listing_failures: u64,
    /// Resolutions abandoned on transport or parse failure
    pub resolution_failures: u64,
    /// Resolved files forwarded to the tag reader
    pub tracks_dispatched: u64,
    /// Tag reads that returned tags
    pub tags_read: u64,
    /// Tag reads that failed
    pub tag_failures: u64,
    /// Operations currently in flight
    pub in_flight: usize,
}
