use std::sync::Arc;

use arc_swap::ArcSwap;

use super::{
  subject_subscription::SubjectSubscription,
  subscribers::{SubscriberEntry, Subscribers},
};
use crate::{error::DisposedError, observable::Observable, observer::Observer};

/// The whole lifecycle of a subject, behind one atomically-swappable
/// reference.
///
/// The tagged state, not snapshot identity, distinguishes "no subscribers
/// yet, still accepting" from "no subscribers because the stream ended" from
/// "no subscribers because the subject was torn down". A terminal error rides
/// in the `Terminated` payload, installed by the same compare-and-swap that
/// performs the transition, so any reader that observes the terminal state
/// observes the fully initialized error with it.
pub(crate) enum SubjectState<Item, Err> {
  Active(Subscribers<Item, Err>),
  Terminated(Option<Err>),
  Disposed,
}

pub(crate) struct SubjectCore<Item, Err> {
  state: ArcSwap<SubjectState<Item, Err>>,
}

/// Subject: a multicast channel that is both a producer sink and an
/// observable source.
///
/// A `Subject` is a cheap clonable handle to shared state; clone it freely to
/// hand one side to producers and the other to consumers. All delivery is
/// synchronous on the calling producer's thread: there is no internal queue,
/// no buffering, and no replay of past values to late subscribers (only the
/// single terminal notification is replayed).
///
/// # Concurrency
///
/// The subscriber registry is an immutable snapshot replaced wholesale
/// through a compare-and-retry loop, so `next` is one atomic load plus
/// iteration and never contends with subscribe/unsubscribe beyond that load.
/// Per-producer emission order is preserved for every subscriber; deliveries
/// from concurrent producers may interleave in either order.
///
/// Disposing a subscription handle is safe from any thread, including from
/// inside that observer's own callback. Emitting into the same subject from
/// inside one of its callbacks is outside the contract: delivery order of the
/// nested emission is unspecified.
///
/// # Example
///
/// ```rust
/// use std::sync::{Arc, Mutex};
///
/// use rxlite::prelude::*;
///
/// let subject = Subject::<i32, ()>::new();
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = seen.clone();
///
/// let subscription = subject
///   .clone()
///   .subscribe(move |v| sink.lock().unwrap().push(v))
///   .unwrap();
///
/// subject.next(1).unwrap();
/// subject.next(2).unwrap();
/// subscription.unsubscribe();
/// subject.next(3).unwrap();
///
/// assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
/// ```
pub struct Subject<Item, Err> {
  core: Arc<SubjectCore<Item, Err>>,
}

impl<Item, Err> Clone for Subject<Item, Err> {
  fn clone(&self) -> Self { Subject { core: self.core.clone() } }
}

impl<Item, Err> Default for Subject<Item, Err> {
  fn default() -> Self { Self::new() }
}

impl<Item, Err> Subject<Item, Err> {
  pub fn new() -> Self {
    Subject {
      core: Arc::new(SubjectCore {
        state: ArcSwap::from_pointee(SubjectState::Active(Subscribers::new())),
      }),
    }
  }

  /// Fan `value` out, in snapshot order, to every currently registered
  /// observer.
  ///
  /// A no-op `Ok(())` after termination: values are neither buffered nor
  /// delivered once the stream ended. Fails with [`DisposedError`] after
  /// [`dispose`](Self::dispose).
  pub fn next(&self, value: Item) -> Result<(), DisposedError>
  where
    Item: Clone,
  {
    // The load guard pins the snapshot for the duration of the fan-out.
    let state = self.core.state.load();
    match &**state {
      SubjectState::Disposed => Err(DisposedError),
      SubjectState::Terminated(_) => Ok(()),
      SubjectState::Active(subscribers) => {
        subscribers.broadcast_value(value);
        Ok(())
      }
    }
  }

  /// End the stream normally. Every observer in the snapshot frozen by the
  /// winning transition receives `complete` exactly once; later subscribers
  /// receive it synchronously at subscribe time. Idempotent once terminated.
  pub fn complete(&self) -> Result<(), DisposedError>
  where
    Err: Clone,
  {
    self.terminate(None)
  }

  /// End the stream with `err`. Delivery mirrors [`complete`](Self::complete),
  /// with the error stored for replay to later subscribers.
  pub fn error(&self, err: Err) -> Result<(), DisposedError>
  where
    Err: Clone,
  {
    self.terminate(Some(err))
  }

  fn terminate(&self, reason: Option<Err>) -> Result<(), DisposedError>
  where
    Err: Clone,
  {
    loop {
      let current = self.core.state.load_full();
      match &*current {
        SubjectState::Disposed => return Err(DisposedError),
        SubjectState::Terminated(_) => return Ok(()),
        SubjectState::Active(_) => {}
      }
      let frozen = Arc::new(SubjectState::Terminated(reason.clone()));
      let prev = self.core.state.compare_and_swap(&current, frozen);
      if Arc::ptr_eq(&prev, &current) {
        // This call won the terminal transition: the snapshot captured in
        // `current` is exactly the set that receives the notification.
        if let SubjectState::Active(subscribers) = &*current {
          match reason {
            Some(err) => subscribers.broadcast_error(err),
            None => subscribers.broadcast_complete(),
          }
        }
        return Ok(());
      }
    }
  }

  /// Tear the subject down, from any state. Idempotent.
  ///
  /// Disposal is silent: no observer lifecycle method is invoked and any
  /// stored terminal error is dropped. Existing subscription handles become
  /// inert; subsequent producer or subscribe calls fail with
  /// [`DisposedError`]. Disposal means "stop accepting work", not
  /// "stream end"; ending the stream is what [`complete`](Self::complete) and
  /// [`error`](Self::error) are for.
  pub fn dispose(&self) { self.core.state.store(Arc::new(SubjectState::Disposed)); }

  /// Number of currently registered subscribers (zero once terminated or
  /// disposed).
  pub fn subscriber_count(&self) -> usize {
    match &**self.core.state.load() {
      SubjectState::Active(subscribers) => subscribers.len(),
      _ => 0,
    }
  }

  /// Whether no subscriber is currently registered.
  pub fn is_empty(&self) -> bool { self.subscriber_count() == 0 }

  fn subscribe_entry(
    &self,
    entry: Arc<SubscriberEntry<Item, Err>>,
  ) -> Result<SubjectSubscription<Item, Err>, DisposedError>
  where
    Err: Clone,
  {
    loop {
      let current = self.core.state.load_full();
      match &*current {
        SubjectState::Disposed => return Err(DisposedError),
        SubjectState::Terminated(reason) => {
          // The stream already ended: replay the terminal notification and
          // hand back an inert token, there is nothing to register for.
          match reason {
            Some(err) => entry.error(err.clone()),
            None => entry.complete(),
          }
          return Ok(SubjectSubscription::inert());
        }
        SubjectState::Active(subscribers) => {
          let grown = Arc::new(SubjectState::Active(subscribers.appended(entry.clone())));
          let prev = self.core.state.compare_and_swap(&current, grown);
          if Arc::ptr_eq(&prev, &current) {
            return Ok(SubjectSubscription::registered(self.core.clone(), entry));
          }
          // Lost the race against a concurrent add/remove/termination;
          // retry from the fresh state.
        }
      }
    }
  }
}

impl<Item, Err> SubjectCore<Item, Err> {
  /// Excise `entry` from the active snapshot with the same compare-and-retry
  /// loop as subscribe. A no-op when the subject is no longer active or the
  /// entry is already gone.
  pub(crate) fn remove_entry(&self, entry: &Arc<SubscriberEntry<Item, Err>>) {
    loop {
      let current = self.state.load_full();
      let subscribers = match &*current {
        SubjectState::Active(subscribers) if !subscribers.is_empty() => subscribers,
        _ => return,
      };
      let Some(shrunk) = subscribers.removed(entry) else { return };
      let shrunk = Arc::new(SubjectState::Active(shrunk));
      let prev = self.state.compare_and_swap(&current, shrunk);
      if Arc::ptr_eq(&prev, &current) {
        return;
      }
    }
  }
}

impl<Item, Err> Observable for Subject<Item, Err>
where
  Item: 'static,
  Err: Clone + 'static,
{
  type Item = Item;
  type Err = Err;
  type Unsub = SubjectSubscription<Item, Err>;

  fn subscribe_observer<O>(self, observer: O) -> Result<Self::Unsub, DisposedError>
  where
    O: Observer<Item, Err> + Send + Sync + 'static,
  {
    let entry = Arc::new(SubscriberEntry::new(Box::new(observer)));
    self.subscribe_entry(entry)
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use crate::prelude::*;

  fn collector<T: Send + 'static>() -> (Arc<Mutex<Vec<T>>>, impl Fn(T) + Send + Sync + 'static) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    (seen, move |v| sink.lock().unwrap().push(v))
  }

  #[test]
  fn delivers_in_emission_order() {
    let subject = Subject::<i32, ()>::new();
    let (seen, sink) = collector();
    let _sub = subject.clone().subscribe(sink).unwrap();

    for v in 1..=5 {
      subject.next(v).unwrap();
    }

    assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3, 4, 5]);
  }

  #[test]
  fn late_subscriber_misses_earlier_values() {
    let subject = Subject::<i32, ()>::new();
    let (early, early_sink) = collector();
    let _early = subject.clone().subscribe(early_sink).unwrap();

    subject.next(1).unwrap();

    let (late, late_sink) = collector();
    let _late = subject.clone().subscribe(late_sink).unwrap();

    subject.next(2).unwrap();

    assert_eq!(*early.lock().unwrap(), vec![1, 2]);
    assert_eq!(*late.lock().unwrap(), vec![2]);
  }

  #[test]
  fn complete_fires_once_and_stops_values() {
    let subject = Subject::<i32, ()>::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let completions = Arc::new(Mutex::new(0));
    let (sink, counter) = (seen.clone(), completions.clone());
    let _sub = subject
      .clone()
      .subscribe_complete(
        move |v| sink.lock().unwrap().push(v),
        move || *counter.lock().unwrap() += 1,
      )
      .unwrap();

    subject.next(1).unwrap();
    subject.complete().unwrap();
    // Idempotent: a second terminal call is a no-op.
    subject.complete().unwrap();
    subject.next(2).unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![1]);
    assert_eq!(*completions.lock().unwrap(), 1);
    assert_eq!(subject.subscriber_count(), 0);
  }

  #[test]
  fn error_fires_once_per_subscriber() {
    let subject = Subject::<i32, &str>::new();
    let errors = Arc::new(Mutex::new(Vec::new()));
    let sink = errors.clone();
    let _sub = subject
      .clone()
      .subscribe_err(|_| {}, move |e| sink.lock().unwrap().push(e))
      .unwrap();

    subject.error("boom").unwrap();
    subject.error("again").unwrap();

    assert_eq!(*errors.lock().unwrap(), vec!["boom"]);
  }

  #[test]
  fn subscribe_after_complete_replays_completion() {
    let subject = Subject::<i32, ()>::new();
    subject.complete().unwrap();

    let (seen, sink) = collector();
    let completions = Arc::new(Mutex::new(0));
    let counter = completions.clone();
    let sub = subject
      .clone()
      .subscribe_complete(sink, move || *counter.lock().unwrap() += 1)
      .unwrap();

    assert_eq!(*completions.lock().unwrap(), 1);
    assert!(seen.lock().unwrap().is_empty());
    assert!(sub.is_closed());
    // Disposing the inert handle is a no-op.
    sub.unsubscribe();
  }

  #[test]
  fn subscribe_after_error_replays_the_stored_error() {
    let subject = Subject::<i32, String>::new();
    subject.error("stored".to_string()).unwrap();

    let errors = Arc::new(Mutex::new(Vec::new()));
    let sink = errors.clone();
    let sub = subject
      .clone()
      .subscribe_err(|_| {}, move |e| sink.lock().unwrap().push(e))
      .unwrap();

    assert_eq!(*errors.lock().unwrap(), vec!["stored".to_string()]);
    assert!(sub.is_closed());
  }

  #[test]
  fn every_operation_fails_after_dispose() {
    let subject = Subject::<i32, ()>::new();
    subject.dispose();
    subject.dispose();

    assert_eq!(subject.next(1), Err(DisposedError));
    assert_eq!(subject.complete(), Err(DisposedError));
    assert_eq!(subject.error(()), Err(DisposedError));
    assert!(subject.clone().subscribe(|_| {}).is_err());
    assert_eq!(subject.subscriber_count(), 0);
  }

  #[test]
  fn dispose_is_silent_for_existing_subscribers() {
    let subject = Subject::<i32, ()>::new();
    let terminals = Arc::new(Mutex::new(0));
    let (on_err, on_comp) = (terminals.clone(), terminals.clone());
    let _sub = subject
      .clone()
      .subscribe_all(
        |_| {},
        move |_| *on_err.lock().unwrap() += 1,
        move || *on_comp.lock().unwrap() += 1,
      )
      .unwrap();

    subject.dispose();

    assert_eq!(*terminals.lock().unwrap(), 0);
  }

  #[test]
  fn dispose_after_termination_clears_the_stored_error() {
    let subject = Subject::<i32, &str>::new();
    subject.error("stored").unwrap();
    subject.dispose();

    assert!(subject.clone().subscribe_err(|_| {}, |_| {}).is_err());
  }

  #[test]
  fn subscriber_count_tracks_registry() {
    let subject = Subject::<i32, ()>::new();
    assert!(subject.is_empty());

    let a = subject.clone().subscribe(|_| {}).unwrap();
    let _b = subject.clone().subscribe(|_| {}).unwrap();
    assert_eq!(subject.subscriber_count(), 2);

    a.unsubscribe();
    assert_eq!(subject.subscriber_count(), 1);
  }
}
