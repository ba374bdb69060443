use super::OperatorSubject;
use crate::{
  error::DisposedError, observable::Observable, observer::Observer, subject::Subject,
};

/// Applies the transform to every value before forwarding; terminal
/// notifications pass through unchanged.
pub struct MapObserver<Out, Err, F> {
  output: Subject<Out, Err>,
  transform: F,
}

impl<In, Out, Err, F> Observer<In, Err> for MapObserver<Out, Err, F>
where
  Out: Clone,
  Err: Clone,
  F: Fn(In) -> Out,
{
  fn next(&self, value: In) { let _ = self.output.next((self.transform)(value)); }

  fn error(&self, err: Err) { let _ = self.output.error(err); }

  fn complete(&self) { let _ = self.output.complete(); }
}

pub trait Map: Observable {
  /// Transform every value with `transform`.
  ///
  /// A transform panic propagates to the producer's call site.
  fn map<Out, F>(self, transform: F) -> Result<OperatorSubject<Out, Self::Err>, DisposedError>
  where
    Self: Sized,
    Self::Unsub: Send + 'static,
    Self::Item: 'static,
    Self::Err: Clone + Send + Sync + 'static,
    Out: Clone + 'static,
    F: Fn(Self::Item) -> Out + Send + Sync + 'static,
  {
    OperatorSubject::connect(self, |output| MapObserver { output, transform })
  }
}

impl<S: Observable> Map for S {}
