//! Debounced URL synchronization.
//!
//! Rapid filter mutations coalesce into a single location write: each
//! trigger cancels the previously scheduled write and reschedules with the
//! latest filters, so exactly one write lands per quiescent period.

use std::sync::{Arc, Mutex, PoisonError};

use super::codec::FilterCodec;
use super::filter::FilterState;
use crate::ports::location_port::LocationPort;
use crate::ports::scheduler_port::{SchedulerPort, TimerHandle};

/// Default quiescence window before a write lands.
pub const DEFAULT_SYNC_DELAY_MS: u64 = 500;

/// Debounced writer of filter state to the shared location.
///
/// One live timer handle per instance, guarded by a mutex: in a threaded
/// host this is the single-owner serialization the single-writer model
/// requires. Writes execute only from the scheduler's timer callback, so
/// superseded writes are cancelled outright, never partially applied.
pub struct DebouncedUrlSync {
    scheduler: Arc<dyn SchedulerPort + Send + Sync>,
    location: Arc<dyn LocationPort + Send + Sync>,
    delay_ms: u64,
    pending: Mutex<Option<TimerHandle>>,
}

impl DebouncedUrlSync {
    pub fn new(
        scheduler: Arc<dyn SchedulerPort + Send + Sync>,
        location: Arc<dyn LocationPort + Send + Sync>,
    ) -> Self {
        Self::with_delay(scheduler, location, DEFAULT_SYNC_DELAY_MS)
    }

    pub fn with_delay(
        scheduler: Arc<dyn SchedulerPort + Send + Sync>,
        location: Arc<dyn LocationPort + Send + Sync>,
        delay_ms: u64,
    ) -> Self {
        Self {
            scheduler,
            location,
            delay_ms,
            pending: Mutex::new(None),
        }
    }

    /// Schedule a write of `filters`, superseding any pending write.
    ///
    /// Triggering again before the delay elapses is the only cancellation
    /// mechanism; there is no separate explicit cancel.
    pub fn trigger(&self, filters: FilterState) {
        let mut pending = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(handle) = pending.take() {
            self.scheduler.cancel(handle);
        }

        let location = Arc::clone(&self.location);
        let handle = self.scheduler.schedule(
            self.delay_ms,
            Box::new(move || {
                FilterCodec::new(location).write_filters(&filters);
            }),
        );
        *pending = Some(handle);
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }
}
