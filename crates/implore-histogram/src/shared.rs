//! Shared histogram slot with change notification

use std::cell::RefCell;
use std::rc::Rc;

use crate::histogram::{HistogramNd, HistogramSource};
use crate::signal::Signal;

/// Holds the current histogram snapshot and announces replacements
///
/// Readers take an `Rc` snapshot; [`SharedHistogram::replace`] swaps in a
/// new snapshot and then emits `changed` with it. Snapshots already handed
/// out are never mutated.
#[derive(Debug)]
pub struct SharedHistogram {
    current: RefCell<Rc<HistogramNd>>,
    changed: Signal<HistogramNd>,
}

impl SharedHistogram {
    pub fn new(histogram: HistogramNd) -> Self {
        Self {
            current: RefCell::new(Rc::new(histogram)),
            changed: Signal::new(),
        }
    }

    /// Current snapshot
    pub fn snapshot(&self) -> Rc<HistogramNd> {
        Rc::clone(&self.current.borrow())
    }

    /// Replace the histogram and notify listeners
    pub fn replace(&self, histogram: HistogramNd) {
        let histogram = Rc::new(histogram);
        *self.current.borrow_mut() = Rc::clone(&histogram);
        tracing::debug!(
            bins = histogram.len(),
            listeners = self.changed.listener_count(),
            "Histogram replaced"
        );
        self.changed.emit(&histogram);
    }

    /// Signal emitted after every [`SharedHistogram::replace`]
    pub fn changed(&self) -> &Signal<HistogramNd> {
        &self.changed
    }
}
