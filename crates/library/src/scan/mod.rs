//! Startup reconciliation.
//!
//! Arrivals that landed while the service was down get no watch event, so on
//! start the inbox's direct children are [reconciled](reconcile) into the
//! same [`WatchedItem`](crate::WatchedItem)s the watcher would have produced.

mod stream;

pub use self::stream::{ScanEvent, reconcile};
