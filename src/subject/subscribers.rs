use std::sync::{
  atomic::{AtomicBool, Ordering},
  Arc,
};

use smallvec::SmallVec;

use crate::observer::Observer;

pub(crate) type SharedObserver<Item, Err> = Box<dyn Observer<Item, Err> + Send + Sync>;

/// One registered observer: the boxed observer plus its disposed flag.
///
/// The flag is the unsubscription tombstone. A subscription handle flips it
/// exactly once; fan-out re-checks it at delivery time, so an observer whose
/// handle was disposed mid-broadcast is skipped even when it is still present
/// in the snapshot being iterated. The allocation itself is reclaimed when the
/// last snapshot referencing the entry drops.
pub(crate) struct SubscriberEntry<Item, Err> {
  observer: SharedObserver<Item, Err>,
  disposed: AtomicBool,
}

impl<Item, Err> SubscriberEntry<Item, Err> {
  pub(crate) fn new(observer: SharedObserver<Item, Err>) -> Self {
    SubscriberEntry { observer, disposed: AtomicBool::new(false) }
  }

  /// Flip the disposed flag; true if this call won the flip.
  pub(crate) fn mark_disposed(&self) -> bool { !self.disposed.swap(true, Ordering::AcqRel) }

  pub(crate) fn is_disposed(&self) -> bool { self.disposed.load(Ordering::Acquire) }

  pub(crate) fn next(&self, value: Item) {
    if !self.is_disposed() {
      self.observer.next(value);
    }
  }

  pub(crate) fn error(&self, err: Err) {
    if !self.is_disposed() {
      self.observer.error(err);
    }
  }

  pub(crate) fn complete(&self) {
    if !self.is_disposed() {
      self.observer.complete();
    }
  }
}

/// An immutable snapshot of the subscriber registry.
///
/// Snapshots are never mutated in place: `appended`/`removed` build the
/// successor snapshot that the subject then installs with a compare-and-swap.
/// Entry identity is pointer identity, matching how subscription handles name
/// their registration.
pub(crate) struct Subscribers<Item, Err> {
  entries: SmallVec<[Arc<SubscriberEntry<Item, Err>>; 2]>,
}

impl<Item, Err> Subscribers<Item, Err> {
  pub(crate) fn new() -> Self { Subscribers { entries: SmallVec::new() } }

  pub(crate) fn len(&self) -> usize { self.entries.len() }

  pub(crate) fn is_empty(&self) -> bool { self.entries.is_empty() }

  pub(crate) fn appended(&self, entry: Arc<SubscriberEntry<Item, Err>>) -> Self {
    let mut entries = self.entries.clone();
    entries.push(entry);
    Subscribers { entries }
  }

  /// The snapshot with `entry` excised, or `None` when `entry` is not a
  /// member (already removed, or never registered here).
  pub(crate) fn removed(&self, entry: &Arc<SubscriberEntry<Item, Err>>) -> Option<Self> {
    let index = self.entries.iter().position(|e| Arc::ptr_eq(e, entry))?;
    let mut entries = self.entries.clone();
    entries.remove(index);
    Some(Subscribers { entries })
  }

  /// Broadcast a value in snapshot order.
  ///
  /// The value is cloned for every observer except the last, which receives
  /// the moved value.
  pub(crate) fn broadcast_value(&self, value: Item)
  where
    Item: Clone,
  {
    let mut iter = self.entries.iter().peekable();
    while let Some(entry) = iter.next() {
      if iter.peek().is_some() {
        entry.next(value.clone());
      } else {
        entry.next(value);
        break;
      }
    }
  }

  /// Broadcast the terminal error in snapshot order, cloning all but the last
  /// delivery.
  pub(crate) fn broadcast_error(&self, err: Err)
  where
    Err: Clone,
  {
    let mut iter = self.entries.iter().peekable();
    while let Some(entry) = iter.next() {
      if iter.peek().is_some() {
        entry.error(err.clone());
      } else {
        entry.error(err);
        break;
      }
    }
  }

  /// Broadcast completion in snapshot order.
  pub(crate) fn broadcast_complete(&self) {
    for entry in &self.entries {
      entry.complete();
    }
  }
}
