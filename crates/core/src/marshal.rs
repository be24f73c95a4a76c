//! Hand-off from the table client's notification thread(s) to the UI thread.
//!
//! Producers push through a cloneable [`UpdateSender`]; the single consumer
//! owns the [`UpdateQueue`] and drains it from inside its own loop (for egui,
//! once per frame). The waker only schedules a drain, it never runs one.

#![forbid(unsafe_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};

use once_cell::sync::OnceCell;
use tracing::debug;

use crate::TableEvent;

type Waker = Box<dyn Fn() + Send + Sync>;

struct Shared {
    waker: OnceCell<Waker>,
    pending: AtomicUsize,
}

/// Create a connected sender/queue pair.
pub fn channel() -> (UpdateSender, UpdateQueue) {
    let (tx, rx) = mpsc::channel::<TableEvent>();
    let shared = Arc::new(Shared { waker: OnceCell::new(), pending: AtomicUsize::new(0) });
    (UpdateSender { tx, shared: Arc::clone(&shared) }, UpdateQueue { rx, shared })
}

#[derive(Clone)]
pub struct UpdateSender {
    tx: mpsc::Sender<TableEvent>,
    shared: Arc<Shared>,
}

impl UpdateSender {
    /// Enqueue without blocking. Returns false once the consumer is gone.
    pub fn send(&self, ev: TableEvent) -> bool {
        self.shared.pending.fetch_add(1, Ordering::AcqRel);
        if self.tx.send(ev).is_err() {
            self.shared.pending.fetch_sub(1, Ordering::AcqRel);
            return false;
        }
        if let Some(wake) = self.shared.waker.get() {
            wake();
        }
        true
    }

    pub fn entry(&self, key: impl Into<String>, value: impl Into<String>, is_new: bool) -> bool {
        self.send(TableEvent::Entry { key: key.into(), value: value.into(), is_new })
    }

    pub fn connection(&self, connected: bool, info: impl Into<String>) -> bool {
        self.send(TableEvent::Connection { connected, info: info.into() })
    }
}

pub struct UpdateQueue {
    rx: mpsc::Receiver<TableEvent>,
    shared: Arc<Shared>,
}

impl UpdateQueue {
    /// Install the callback producers use to ask the consumer loop for a drain.
    /// Anything queued before attachment triggers one wake right away.
    /// Only the first waker sticks; later calls return false.
    pub fn attach_waker<F>(&self, wake: F) -> bool
    where
        F: Fn() + Send + Sync + 'static,
    {
        if self.shared.waker.set(Box::new(wake)).is_err() {
            return false;
        }
        let pending = self.pending();
        if pending > 0 {
            debug!(pending, "marshal: waker attached with queued events");
            if let Some(wake) = self.shared.waker.get() {
                wake();
            }
        }
        true
    }

    /// Events sent but not yet taken by the consumer.
    pub fn pending(&self) -> usize {
        self.shared.pending.load(Ordering::Acquire)
    }

    pub fn try_next(&self) -> Option<TableEvent> {
        match self.rx.try_recv() {
            Ok(ev) => {
                self.shared.pending.fetch_sub(1, Ordering::AcqRel);
                Some(ev)
            }
            Err(_) => None,
        }
    }

    /// Take at most `budget` events in arrival order.
    pub fn drain(&self, budget: usize) -> Vec<TableEvent> {
        let mut out = Vec::with_capacity(budget.min(self.pending()));
        while out.len() < budget {
            match self.try_next() {
                Some(ev) => out.push(ev),
                None => break,
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn queues_until_waker_attached() {
        let (tx, rx) = channel();
        assert!(tx.entry("/a", "1", true));
        assert!(tx.entry("/a", "2", false));
        assert_eq!(rx.pending(), 2);

        let wakes = Arc::new(AtomicUsize::new(0));
        let w = Arc::clone(&wakes);
        assert!(rx.attach_waker(move || {
            w.fetch_add(1, Ordering::SeqCst);
        }));
        // queued events trigger exactly one wake on attach
        assert_eq!(wakes.load(Ordering::SeqCst), 1);
        assert!(!rx.attach_waker(|| {}));

        tx.connection(true, "peer");
        assert_eq!(wakes.load(Ordering::SeqCst), 2);

        let got = rx.drain(usize::MAX);
        assert_eq!(got.len(), 3);
        assert_eq!(got[0], TableEvent::Entry { key: "/a".into(), value: "1".into(), is_new: true });
        assert_eq!(got[1], TableEvent::Entry { key: "/a".into(), value: "2".into(), is_new: false });
        assert_eq!(rx.pending(), 0);
    }

    #[test]
    fn drain_respects_budget_and_keeps_order() {
        let (tx, rx) = channel();
        for i in 0..10 {
            tx.entry("/k", i.to_string(), i == 0);
        }
        let first = rx.drain(4);
        let rest = rx.drain(100);
        assert_eq!(first.len(), 4);
        assert_eq!(rest.len(), 6);
        let values: Vec<String> = first
            .into_iter()
            .chain(rest)
            .map(|ev| match ev {
                TableEvent::Entry { value, .. } => value,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(values, (0..10).map(|i| i.to_string()).collect::<Vec<_>>());
    }

    #[test]
    fn send_fails_after_consumer_dropped() {
        let (tx, rx) = channel();
        drop(rx);
        assert!(!tx.entry("/a", "x", true));
    }
}
