//! Disposal primitives
//!
//! A [`Subscription`] is an exactly-once cleanup capability: the handle
//! returned by subscribing to a subject, an arbitrary teardown action, or a
//! group of either that must be released together. `unsubscribe` consumes the
//! handle, so "runs at most once" is enforced by ownership rather than by a
//! runtime flag wherever a handle has a single owner; the composite types add
//! the flag where handles are shared.

use std::sync::{Arc, Mutex};

use smallvec::SmallVec;

/// Subscription: a cancellation/teardown handle.
pub trait Subscription {
  /// Release whatever this handle guards. Consuming `self` makes a second
  /// call unrepresentable.
  fn unsubscribe(self);

  /// Whether the handle already fired (or never guarded anything).
  fn is_closed(&self) -> bool;

  /// Activates RAII behavior for this subscription: `unsubscribe` runs as
  /// soon as the returned guard goes out of scope.
  ///
  /// **Attention:** if you don't assign the return value to a variable, the
  /// guard drops immediately, which is probably not what you want.
  fn unsubscribe_when_dropped(self) -> SubscriptionGuard<Self>
  where
    Self: Sized,
  {
    SubscriptionGuard::new(self)
  }
}

/// The empty placeholder: disposing it does nothing.
impl Subscription for () {
  fn unsubscribe(self) {}

  fn is_closed(&self) -> bool { true }
}

/// A subscription that runs an arbitrary action on unsubscribe.
///
/// The action runs at most once; ownership of the handle is the guard.
pub struct ActionSubscription<F>(F);

impl<F: FnOnce()> ActionSubscription<F> {
  #[inline]
  pub fn new(action: F) -> Self { ActionSubscription(action) }
}

impl<F: FnOnce()> Subscription for ActionSubscription<F> {
  fn unsubscribe(self) { (self.0)() }

  fn is_closed(&self) -> bool { false }
}

/// Helper trait for calling unsubscribe on boxed trait objects
///
/// Since `Subscription::unsubscribe(self)` requires `Sized`, this workaround
/// trait enables `Box<dyn ...>` to call unsubscribe.
pub trait BoxedSubscriptionInner {
  fn boxed_unsubscribe(self: Box<Self>);
  fn boxed_is_closed(&self) -> bool;
}

impl<T: Subscription> BoxedSubscriptionInner for T {
  #[inline]
  fn boxed_unsubscribe(self: Box<Self>) { (*self).unsubscribe() }

  #[inline]
  fn boxed_is_closed(&self) -> bool { self.is_closed() }
}

/// A type-erased subscription, for storing heterogeneous handles in
/// collections. Always `Send`: subscriptions are control handles meant to be
/// stored and fired from an arbitrary later thread.
pub struct BoxedSubscription(Box<dyn BoxedSubscriptionInner + Send>);

impl BoxedSubscription {
  #[inline]
  pub fn new(subscription: impl Subscription + Send + 'static) -> Self {
    BoxedSubscription(Box::new(subscription))
  }
}

impl Subscription for BoxedSubscription {
  #[inline]
  fn unsubscribe(self) { self.0.boxed_unsubscribe() }

  #[inline]
  fn is_closed(&self) -> bool { self.0.boxed_is_closed() }
}

/// A growable, thread-safe, unordered group of subscriptions that are
/// released together.
///
/// Cloning yields another handle to the same group. Adding to a group that
/// already fired releases the new item immediately instead of storing it, so
/// a resource registered after teardown cannot leak; the closed flag and the
/// drain happen under one lock, so an `add` racing `unsubscribe` lands in
/// exactly one of the two paths.
#[derive(Clone, Default)]
pub struct CompositeSubscription(Arc<Mutex<CompositeInner>>);

#[derive(Default)]
struct CompositeInner {
  closed: bool,
  teardown: SmallVec<[BoxedSubscription; 1]>,
}

impl CompositeSubscription {
  pub fn new() -> Self { Self::default() }

  pub fn add(&self, subscription: impl Subscription + Send + 'static) {
    let boxed = BoxedSubscription::new(subscription);
    let mut inner = self.0.lock().unwrap();
    if inner.closed {
      // Teardown actions run outside the lock.
      drop(inner);
      boxed.unsubscribe();
    } else {
      inner.teardown.push(boxed);
    }
  }

  /// Number of subscriptions currently held.
  pub fn teardown_size(&self) -> usize { self.0.lock().unwrap().teardown.len() }
}

impl Subscription for CompositeSubscription {
  fn unsubscribe(self) {
    let drained = {
      let mut inner = self.0.lock().unwrap();
      if inner.closed {
        return;
      }
      inner.closed = true;
      std::mem::take(&mut inner.teardown)
    };
    for subscription in drained {
      subscription.unsubscribe();
    }
  }

  fn is_closed(&self) -> bool { self.0.lock().unwrap().closed }
}

/// A fixed, non-growing group of subscriptions released together.
///
/// The first `unsubscribe` among all cloned handles takes the member list
/// whole; every member is released exactly once even when several handles
/// race.
#[derive(Clone)]
pub struct StableCompositeSubscription(Arc<Mutex<Option<SmallVec<[BoxedSubscription; 4]>>>>);

impl StableCompositeSubscription {
  pub fn new<I>(subscriptions: I) -> Self
  where
    I: IntoIterator<Item = BoxedSubscription>,
  {
    StableCompositeSubscription(Arc::new(Mutex::new(Some(
      subscriptions.into_iter().collect(),
    ))))
  }
}

impl Subscription for StableCompositeSubscription {
  fn unsubscribe(self) {
    let drained = self.0.lock().unwrap().take();
    if let Some(subscriptions) = drained {
      for subscription in subscriptions {
        subscription.unsubscribe();
      }
    }
  }

  fn is_closed(&self) -> bool { self.0.lock().unwrap().is_none() }
}

/// An RAII wrapper: when the guard is dropped, the wrapped subscription fires.
///
/// If you want to drop it immediately, wrap it in its own scope.
#[must_use]
pub struct SubscriptionGuard<T: Subscription>(Option<T>);

impl<T: Subscription> SubscriptionGuard<T> {
  pub fn new(subscription: T) -> Self { SubscriptionGuard(Some(subscription)) }
}

impl<T: Subscription> Drop for SubscriptionGuard<T> {
  fn drop(&mut self) {
    if let Some(subscription) = self.0.take() {
      subscription.unsubscribe();
    }
  }
}

#[cfg(test)]
mod tests {
  use std::sync::atomic::{AtomicUsize, Ordering};

  use super::*;

  #[test]
  fn action_runs_on_unsubscribe() {
    let fired = Arc::new(AtomicUsize::new(0));
    let counter = fired.clone();
    let subscription = ActionSubscription::new(move || {
      counter.fetch_add(1, Ordering::SeqCst);
    });

    assert!(!subscription.is_closed());
    subscription.unsubscribe();
    assert_eq!(fired.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn unit_is_the_empty_placeholder() {
    let empty = ();
    assert!(empty.is_closed());
    empty.unsubscribe();
  }

  #[test]
  fn composite_releases_members_together() {
    let fired = Arc::new(AtomicUsize::new(0));
    let composite = CompositeSubscription::new();
    for _ in 0..3 {
      let counter = fired.clone();
      composite.add(ActionSubscription::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
      }));
    }
    assert_eq!(composite.teardown_size(), 3);

    composite.clone().unsubscribe();
    assert_eq!(fired.load(Ordering::SeqCst), 3);
    assert!(composite.is_closed());
    assert_eq!(composite.teardown_size(), 0);
  }

  #[test]
  fn add_after_unsubscribe_releases_immediately() {
    let composite = CompositeSubscription::new();
    composite.clone().unsubscribe();

    let fired = Arc::new(AtomicUsize::new(0));
    let counter = fired.clone();
    composite.add(ActionSubscription::new(move || {
      counter.fetch_add(1, Ordering::SeqCst);
    }));

    assert_eq!(fired.load(Ordering::SeqCst), 1);
    assert_eq!(composite.teardown_size(), 0);
  }

  #[test]
  fn composite_unsubscribe_is_idempotent() {
    let fired = Arc::new(AtomicUsize::new(0));
    let composite = CompositeSubscription::new();
    let counter = fired.clone();
    composite.add(ActionSubscription::new(move || {
      counter.fetch_add(1, Ordering::SeqCst);
    }));

    composite.clone().unsubscribe();
    composite.clone().unsubscribe();
    assert_eq!(fired.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn stable_composite_releases_each_member_once() {
    let fired = Arc::new(AtomicUsize::new(0));
    let members = (0..4).map(|_| {
      let counter = fired.clone();
      BoxedSubscription::new(ActionSubscription::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
      }))
    });
    let stable = StableCompositeSubscription::new(members);
    let other_handle = stable.clone();

    stable.unsubscribe();
    other_handle.clone().unsubscribe();

    assert_eq!(fired.load(Ordering::SeqCst), 4);
    assert!(other_handle.is_closed());
  }

  #[test]
  fn guard_unsubscribes_on_drop() {
    let fired = Arc::new(AtomicUsize::new(0));
    {
      let counter = fired.clone();
      let _guard = ActionSubscription::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
      })
      .unsubscribe_when_dropped();
      assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
    assert_eq!(fired.load(Ordering::SeqCst), 1);
  }
}
