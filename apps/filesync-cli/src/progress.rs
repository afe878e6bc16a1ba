//! Terminal progress bars driven by transfer store events.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use filesync_transfer::{StoreEvent, SubscriptionId, TransferStatus, TransferStore};
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

/// One bar per file, created on the file's first record update.
pub struct ProgressRenderer {
    mp: MultiProgress,
    bars: Mutex<HashMap<String, ProgressBar>>,
}

impl ProgressRenderer {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    pub fn with_draw_target(target: ProgressDrawTarget) -> Self {
        Self {
            mp: MultiProgress::with_draw_target(target),
            bars: Mutex::new(HashMap::new()),
        }
    }

    /// Subscribes to `store` and renders every update until unsubscribed.
    pub fn attach(self: &Arc<Self>, store: &TransferStore) -> SubscriptionId {
        let renderer = Arc::clone(self);
        store.subscribe(move |event| renderer.handle(event))
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg:30} [{bar:40.cyan/blue}] {pos:>3}%")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-")
    }

    fn handle(&self, event: &StoreEvent) {
        let mut bars = self.bars.lock().unwrap();
        let record = match event {
            StoreEvent::Updated(record) => record,
            StoreEvent::Cleared => {
                for (_, bar) in bars.drain() {
                    bar.finish_and_clear();
                }
                return;
            }
        };

        let pb = bars.entry(record.file_id.clone()).or_insert_with(|| {
            let pb = self.mp.add(ProgressBar::new(100));
            pb.set_style(Self::bar_style());
            pb
        });

        match &record.status {
            TransferStatus::Idle => {}
            TransferStatus::InProgress(direction) => {
                if pb.is_finished() {
                    pb.reset();
                }
                pb.set_position(record.progress as u64);
                pb.set_message(format!("{direction} {}", record.file_id));
            }
            TransferStatus::Success => {
                pb.set_position(100);
                pb.finish_with_message(format!("[DONE] {}", record.file_id));
            }
            TransferStatus::Error(message) => {
                pb.abandon_with_message(format!("[FAILED] {}: {message}", record.file_id));
            }
        }
    }

    /// Position of the bar for `file_id`, if one exists.
    #[cfg(test)]
    fn position(&self, file_id: &str) -> Option<u64> {
        self.bars.lock().unwrap().get(file_id).map(|pb| pb.position())
    }

    #[cfg(test)]
    fn is_finished(&self, file_id: &str) -> Option<bool> {
        self.bars
            .lock()
            .unwrap()
            .get(file_id)
            .map(|pb| pb.is_finished())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filesync_transfer::TransferDirection;

    fn hidden() -> (Arc<ProgressRenderer>, TransferStore) {
        let renderer = Arc::new(ProgressRenderer::with_draw_target(ProgressDrawTarget::hidden()));
        let store = TransferStore::new();
        renderer.attach(&store);
        (renderer, store)
    }

    #[test]
    fn tracks_progress_until_done() {
        let (renderer, store) = hidden();

        store.set_status("a.txt", TransferStatus::InProgress(TransferDirection::Upload));
        store.set_progress("a.txt", 42.7);
        assert_eq!(renderer.position("a.txt"), Some(42));
        assert_eq!(renderer.is_finished("a.txt"), Some(false));

        store.set_status("a.txt", TransferStatus::Success);
        assert_eq!(renderer.position("a.txt"), Some(100));
        assert_eq!(renderer.is_finished("a.txt"), Some(true));
    }

    #[test]
    fn failure_finishes_bar() {
        let (renderer, store) = hidden();

        store.set_status("b.txt", TransferStatus::InProgress(TransferDirection::Download));
        store.set_status("b.txt", TransferStatus::Error("disk full".into()));
        assert_eq!(renderer.is_finished("b.txt"), Some(true));
    }

    #[test]
    fn clear_drops_bars() {
        let (renderer, store) = hidden();

        store.set_status("a.txt", TransferStatus::InProgress(TransferDirection::Upload));
        store.clear_all();
        assert_eq!(renderer.position("a.txt"), None);
    }

    #[test]
    fn detached_renderer_ignores_updates() {
        let renderer = Arc::new(ProgressRenderer::with_draw_target(ProgressDrawTarget::hidden()));
        let store = TransferStore::new();
        let id = renderer.attach(&store);
        assert!(store.unsubscribe(id));

        store.set_progress("a.txt", 10.0);
        assert_eq!(renderer.position("a.txt"), None);
    }
}
