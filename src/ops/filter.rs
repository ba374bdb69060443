use super::OperatorSubject;
use crate::{
  error::DisposedError, observable::Observable, observer::Observer, subject::Subject,
};

/// Forwards only the values the predicate accepts; terminal notifications
/// pass through unchanged.
pub struct FilterObserver<Item, Err, F> {
  output: Subject<Item, Err>,
  predicate: F,
}

impl<Item, Err, F> Observer<Item, Err> for FilterObserver<Item, Err, F>
where
  Item: Clone,
  Err: Clone,
  F: Fn(&Item) -> bool,
{
  fn next(&self, value: Item) {
    if (self.predicate)(&value) {
      // A disposed stage quietly drops late upstream notifications.
      let _ = self.output.next(value);
    }
  }

  fn error(&self, err: Err) { let _ = self.output.error(err); }

  fn complete(&self) { let _ = self.output.complete(); }
}

pub trait Filter: Observable {
  /// Keep only the values for which `predicate` returns true.
  ///
  /// A predicate panic propagates to the producer's call site.
  fn filter<F>(
    self,
    predicate: F,
  ) -> Result<OperatorSubject<Self::Item, Self::Err>, DisposedError>
  where
    Self: Sized,
    Self::Unsub: Send + 'static,
    Self::Item: Clone + 'static,
    Self::Err: Clone + Send + Sync + 'static,
    F: Fn(&Self::Item) -> bool + Send + Sync + 'static,
  {
    OperatorSubject::connect(self, |output| FilterObserver { output, predicate })
  }
}

impl<S: Observable> Filter for S {}
