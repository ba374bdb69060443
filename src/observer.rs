//! Observer trait and callback adapters
//!
//! The Observer trait defines the consumer of data in the reactive pattern.
//! It provides three methods: next (for values), error (for errors), and
//! complete (for stream completion).

use std::fmt::Debug;

/// Observer: one consumer of a subject's notifications.
///
/// All three methods take `&self`: a subject fans a single notification out to
/// many registered observers and may invoke the same observer from several
/// producer threads, so observers own their interior mutability (an
/// `Arc<Mutex<_>>` counter, an atomic, a channel sender). Exactly-once
/// delivery of `error`/`complete` is guaranteed by the subject's state
/// machine, not by consuming the observer.
pub trait Observer<Item, Err> {
  /// Receive the next value from the stream.
  fn next(&self, value: Item);

  /// Receive the terminal error of the stream.
  fn error(&self, err: Err);

  /// Receive the completion of the stream.
  fn complete(&self);
}

/// Closure adapter carrying only a `next` handler.
///
/// This backs the plain `subscribe(next)` surface. An unhandled stream error
/// is re-raised on the delivering thread, so errors are never swallowed by
/// omission.
#[derive(Clone)]
pub struct ObserverNext<N>(pub N);

impl<Item, Err, N> Observer<Item, Err> for ObserverNext<N>
where
  N: Fn(Item),
  Err: Debug,
{
  #[inline]
  fn next(&self, value: Item) { (self.0)(value); }

  fn error(&self, err: Err) { panic!("unhandled stream error: {err:?}"); }

  fn complete(&self) {}
}

/// Closure adapter with `next` and `error` handlers; completion is a no-op.
#[derive(Clone)]
pub struct ObserverErr<N, E> {
  next: N,
  error: E,
}

impl<N, E> ObserverErr<N, E> {
  #[inline]
  pub fn new(next: N, error: E) -> Self { ObserverErr { next, error } }
}

impl<Item, Err, N, E> Observer<Item, Err> for ObserverErr<N, E>
where
  N: Fn(Item),
  E: Fn(Err),
{
  #[inline]
  fn next(&self, value: Item) { (self.next)(value); }

  #[inline]
  fn error(&self, err: Err) { (self.error)(err); }

  fn complete(&self) {}
}

/// Closure adapter with `next` and `complete` handlers; an unhandled stream
/// error is re-raised on the delivering thread.
#[derive(Clone)]
pub struct ObserverComp<N, C> {
  next: N,
  complete: C,
}

impl<N, C> ObserverComp<N, C> {
  #[inline]
  pub fn new(next: N, complete: C) -> Self { ObserverComp { next, complete } }
}

impl<Item, Err, N, C> Observer<Item, Err> for ObserverComp<N, C>
where
  N: Fn(Item),
  C: Fn(),
  Err: Debug,
{
  #[inline]
  fn next(&self, value: Item) { (self.next)(value); }

  fn error(&self, err: Err) { panic!("unhandled stream error: {err:?}"); }

  #[inline]
  fn complete(&self) { (self.complete)(); }
}

/// Closure adapter carrying all three handlers.
#[derive(Clone)]
pub struct ObserverAll<N, E, C> {
  next: N,
  error: E,
  complete: C,
}

impl<N, E, C> ObserverAll<N, E, C> {
  #[inline]
  pub fn new(next: N, error: E, complete: C) -> Self { ObserverAll { next, error, complete } }
}

impl<Item, Err, N, E, C> Observer<Item, Err> for ObserverAll<N, E, C>
where
  N: Fn(Item),
  E: Fn(Err),
  C: Fn(),
{
  #[inline]
  fn next(&self, value: Item) { (self.next)(value); }

  #[inline]
  fn error(&self, err: Err) { (self.error)(err); }

  #[inline]
  fn complete(&self) { (self.complete)(); }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use super::*;

  #[test]
  fn closure_as_observer() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let observer = ObserverNext(move |v: i32| sink.lock().unwrap().push(v));

    Observer::<_, ()>::next(&observer, 10);
    Observer::<_, ()>::next(&observer, 20);
    Observer::<_, ()>::complete(&observer);

    assert_eq!(*seen.lock().unwrap(), vec![10, 20]);
  }

  #[test]
  #[should_panic(expected = "unhandled stream error")]
  fn missing_error_handler_rethrows() {
    let observer = ObserverNext(|_: i32| {});
    observer.error("boom");
  }

  #[test]
  fn all_handlers_dispatch() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let (n, e, c) = (log.clone(), log.clone(), log.clone());
    let observer = ObserverAll::new(
      move |v: i32| n.lock().unwrap().push(format!("next {v}")),
      move |err: &str| e.lock().unwrap().push(format!("error {err}")),
      move || c.lock().unwrap().push("complete".into()),
    );

    observer.next(1);
    observer.error("bad");
    observer.complete();

    assert_eq!(*log.lock().unwrap(), vec!["next 1", "error bad", "complete"]);
  }
}
