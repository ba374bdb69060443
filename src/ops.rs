//! Transformation operators
//!
//! Every operator stage has the same shape: a fresh output [`Subject`] of the
//! result type, an immediate upstream subscription through a forwarding
//! observer, and the stored upstream token. The stage is itself observable;
//! downstream consumers subscribe to the output subject and detach
//! individually, while disposing the stage detaches it from upstream entirely
//! and tears the output down with it.

pub mod filter;
pub mod map;
pub mod of_type;

pub use filter::Filter;
pub use map::Map;
pub use of_type::{AnyItem, OfType};

use std::sync::{Arc, Mutex};

use crate::{
  error::DisposedError,
  observable::Observable,
  observer::Observer,
  subject::{Subject, SubjectSubscription},
  subscription::{BoxedSubscription, Subscription},
};

/// An operator stage: an output subject fed by an owned upstream subscription.
///
/// Cloning yields another handle to the same stage. A stage built on a
/// terminated source is born terminated: the source replays its terminal
/// notification through the forwarding observer during construction, so later
/// subscribers to the stage receive the replay too.
pub struct OperatorSubject<Item, Err> {
  output: Subject<Item, Err>,
  upstream: Arc<Mutex<Option<BoxedSubscription>>>,
}

impl<Item, Err> Clone for OperatorSubject<Item, Err> {
  fn clone(&self) -> Self {
    OperatorSubject { output: self.output.clone(), upstream: self.upstream.clone() }
  }
}

impl<Item, Err> OperatorSubject<Item, Err> {
  /// Subscribe `forward(output)` to `source` and wrap the pair as a stage.
  pub(crate) fn connect<S, O, F>(source: S, forward: F) -> Result<Self, DisposedError>
  where
    S: Observable,
    S::Unsub: Send + 'static,
    O: Observer<S::Item, S::Err> + Send + Sync + 'static,
    F: FnOnce(Subject<Item, Err>) -> O,
  {
    let output = Subject::new();
    let upstream = source.subscribe_observer(forward(output.clone()))?;
    Ok(OperatorSubject {
      output,
      upstream: Arc::new(Mutex::new(Some(BoxedSubscription::new(upstream)))),
    })
  }

  /// Detach the stage from upstream (exactly once, no matter how stage
  /// handles race) and dispose the output subject.
  pub fn dispose(&self) {
    let upstream = self.upstream.lock().unwrap().take();
    if let Some(upstream) = upstream {
      upstream.unsubscribe();
    }
    self.output.dispose();
  }

  /// Number of downstream subscribers currently attached to the stage.
  pub fn subscriber_count(&self) -> usize { self.output.subscriber_count() }
}

impl<Item, Err> Observable for OperatorSubject<Item, Err>
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
    self.output.subscribe_observer(observer)
  }
}
