//! Observable trait and the callback subscribe surface
//!
//! [`Observable`] is the consumer-facing contract of a subject or operator
//! stage: hand it an [`Observer`] and get back a cancellation handle. The
//! `Subscribe*` extension traits layer plain closures over it, defaulting an
//! omitted error handler to re-raising the error on the delivering thread and
//! an omitted completion handler to a no-op.

use std::fmt::Debug;

use crate::{
  error::DisposedError,
  observer::{Observer, ObserverAll, ObserverComp, ObserverErr, ObserverNext},
  subscription::Subscription,
};

/// A source of notifications that observers can register with.
///
/// `subscribe_observer` consumes the handle it is called on; sources are cheap
/// clonable handles, so the idiom is `source.clone().subscribe(...)`.
pub trait Observable {
  type Item;
  type Err;
  type Unsub: Subscription;

  /// Register `observer` for every notification emitted after registration
  /// succeeds.
  ///
  /// On a terminated source this synchronously replays the stored terminal
  /// notification to `observer` and returns an inert handle; on a disposed
  /// source it fails with [`DisposedError`].
  fn subscribe_observer<O>(self, observer: O) -> Result<Self::Unsub, DisposedError>
  where
    O: Observer<Self::Item, Self::Err> + Send + Sync + 'static;
}

/// Subscribe with a value handler only.
pub trait SubscribeNext: Observable {
  /// An unhandled stream error panics on the delivering thread; completion is
  /// ignored.
  fn subscribe<N>(self, next: N) -> Result<Self::Unsub, DisposedError>
  where
    Self: Sized,
    N: Fn(Self::Item) + Send + Sync + 'static,
    Self::Err: Debug,
  {
    self.subscribe_observer(ObserverNext(next))
  }
}

impl<S: Observable> SubscribeNext for S {}

/// Subscribe with value and error handlers.
pub trait SubscribeErr: Observable {
  fn subscribe_err<N, E>(self, next: N, error: E) -> Result<Self::Unsub, DisposedError>
  where
    Self: Sized,
    N: Fn(Self::Item) + Send + Sync + 'static,
    E: Fn(Self::Err) + Send + Sync + 'static,
  {
    self.subscribe_observer(ObserverErr::new(next, error))
  }
}

impl<S: Observable> SubscribeErr for S {}

/// Subscribe with value and completion handlers.
pub trait SubscribeComp: Observable {
  /// An unhandled stream error panics on the delivering thread.
  fn subscribe_complete<N, C>(self, next: N, complete: C) -> Result<Self::Unsub, DisposedError>
  where
    Self: Sized,
    N: Fn(Self::Item) + Send + Sync + 'static,
    C: Fn() + Send + Sync + 'static,
    Self::Err: Debug,
  {
    self.subscribe_observer(ObserverComp::new(next, complete))
  }
}

impl<S: Observable> SubscribeComp for S {}

/// Subscribe with the full capability set.
pub trait SubscribeAll: Observable {
  fn subscribe_all<N, E, C>(
    self,
    next: N,
    error: E,
    complete: C,
  ) -> Result<Self::Unsub, DisposedError>
  where
    Self: Sized,
    N: Fn(Self::Item) + Send + Sync + 'static,
    E: Fn(Self::Err) + Send + Sync + 'static,
    C: Fn() + Send + Sync + 'static,
  {
    self.subscribe_observer(ObserverAll::new(next, error, complete))
  }
}

impl<S: Observable> SubscribeAll for S {}
