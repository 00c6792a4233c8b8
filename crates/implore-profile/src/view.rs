//! Live profile of a shared histogram
//!
//! A [`ProfileView`] owns a [`ProfileReducer`], listens to a
//! [`SharedHistogram`] and rebuilds its table on every change. The table is
//! handed out as an `Rc` snapshot, so a consumer never observes a partially
//! built table; the view's own `changed` signal fires after the swap.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use implore_histogram::{HistogramNd, HistogramSource, Signal, SharedHistogram, SubscriptionId};

use crate::config::ProfileConfig;
use crate::error::ProfileResult;
use crate::reducer::ProfileReducer;
use crate::table::ProfileTable;

/// Profile table kept in sync with a shared histogram
#[derive(Debug)]
pub struct ProfileView {
    reducer: ProfileReducer,
    table: RefCell<Rc<ProfileTable>>,
    last_error: RefCell<Option<String>>,
    changed: Signal<ProfileTable>,
    source: Weak<SharedHistogram>,
    subscription: Cell<Option<SubscriptionId>>,
}

impl ProfileView {
    /// Compute the initial table and subscribe to `source`
    ///
    /// Fails without subscribing if the configuration is invalid for the
    /// current histogram.
    pub fn connect(config: ProfileConfig, source: &Rc<SharedHistogram>) -> ProfileResult<Rc<Self>> {
        let reducer = ProfileReducer::new(config)?;
        let initial = reducer.reduce(source.snapshot().as_ref())?;

        let view = Rc::new(Self {
            reducer,
            table: RefCell::new(Rc::new(initial)),
            last_error: RefCell::new(None),
            changed: Signal::new(),
            source: Rc::downgrade(source),
            subscription: Cell::new(None),
        });

        let weak = Rc::downgrade(&view);
        let id = source.changed().subscribe(move |histogram: &HistogramNd| {
            if let Some(view) = weak.upgrade() {
                if let Err(err) = view.recompute(histogram) {
                    tracing::error!("Profile recompute failed: {}", err);
                }
            }
        });
        view.subscription.set(Some(id));

        Ok(view)
    }

    /// Fully recompute the table from `histogram`
    ///
    /// On success the table is replaced and `changed` is emitted. On failure
    /// the previous table stays in place and the error is remembered.
    pub fn recompute(&self, histogram: &dyn HistogramSource) -> ProfileResult<()> {
        match self.reducer.reduce(histogram) {
            Ok(table) => {
                let table = Rc::new(table);
                *self.table.borrow_mut() = Rc::clone(&table);
                *self.last_error.borrow_mut() = None;
                self.changed.emit(&table);
                Ok(())
            }
            Err(err) => {
                *self.last_error.borrow_mut() = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Current table snapshot
    pub fn table(&self) -> Rc<ProfileTable> {
        Rc::clone(&self.table.borrow())
    }

    /// Emitted after every successful recompute
    pub fn changed(&self) -> &Signal<ProfileTable> {
        &self.changed
    }

    pub fn config(&self) -> &ProfileConfig {
        self.reducer.config()
    }

    /// Message of the most recent failed recompute, cleared on success
    pub fn last_error(&self) -> Option<String> {
        self.last_error.borrow().clone()
    }
}

impl Drop for ProfileView {
    fn drop(&mut self) {
        if let (Some(source), Some(id)) = (self.source.upgrade(), self.subscription.get()) {
            source.changed().unsubscribe(id);
        }
    }
}
