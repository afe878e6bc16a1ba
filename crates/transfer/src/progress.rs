use std::sync::Arc;

/// Callback invoked with a completion percentage in `[0, 100]`.
pub type ProgressCallback = Arc<dyn Fn(f64) + Send + Sync>;

/// Completion percentage of `done` out of `total` bytes.
///
/// An unknown or zero total yields 0: the size is not known until the
/// transfer finishes. The result never exceeds 100.
pub fn percent(done: u64, total: Option<u64>) -> f64 {
    match total {
        Some(total) if total > 0 => (done as f64 / total as f64 * 100.0).min(100.0),
        _ => 0.0,
    }
}

/// Turns byte counts into monotonic percentage callbacks.
///
/// Only strictly increasing percentages are reported, so callers can feed it
/// every chunk without flooding the callback.
pub struct ProgressMeter {
    total: Option<u64>,
    done: u64,
    last_reported: f64,
    callback: ProgressCallback,
}

impl ProgressMeter {
    /// Creates a meter for a transfer of `total` bytes (`None` if unknown).
    pub fn new(total: Option<u64>, callback: ProgressCallback) -> Self {
        Self {
            total,
            done: 0,
            last_reported: 0.0,
            callback,
        }
    }

    /// Records `bytes` more transferred and reports if the percentage moved.
    pub fn advance(&mut self, bytes: u64) {
        self.done = self.done.saturating_add(bytes);
        let pct = percent(self.done, self.total);
        if pct > self.last_reported {
            self.last_reported = pct;
            (self.callback)(pct);
        }
    }

    /// Reports 100 if it has not been reported yet.
    ///
    /// Call once the remote side has confirmed completion.
    pub fn finish(&mut self) {
        if self.last_reported < 100.0 {
            self.last_reported = 100.0;
            (self.callback)(100.0);
        }
    }

    /// Bytes counted so far.
    pub fn bytes_done(&self) -> u64 {
        self.done
    }
}
