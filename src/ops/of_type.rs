use std::{any::Any, sync::Arc};

use super::OperatorSubject;
use crate::{
  error::DisposedError, observable::Observable, observer::Observer, subject::Subject,
};

/// The dynamically typed item carried by sources that [`of_type`](OfType::of_type)
/// can narrow.
pub type AnyItem = Arc<dyn Any + Send + Sync>;

/// Forwards only the values whose runtime type is `T`, narrowed to `Arc<T>`;
/// terminal notifications pass through unchanged.
pub struct OfTypeObserver<T, Err> {
  output: Subject<Arc<T>, Err>,
}

impl<T, Err> Observer<AnyItem, Err> for OfTypeObserver<T, Err>
where
  T: Any + Send + Sync,
  Err: Clone,
{
  fn next(&self, value: AnyItem) {
    if let Ok(narrowed) = value.downcast::<T>() {
      let _ = self.output.next(narrowed);
    }
  }

  fn error(&self, err: Err) { let _ = self.output.error(err); }

  fn complete(&self) { let _ = self.output.complete(); }
}

pub trait OfType: Observable<Item = AnyItem> {
  /// Keep only the values whose runtime type is `T`, narrowing the stream
  /// from [`AnyItem`] to `Arc<T>`.
  fn of_type<T>(self) -> Result<OperatorSubject<Arc<T>, Self::Err>, DisposedError>
  where
    Self: Sized,
    Self::Unsub: Send + 'static,
    Self::Err: Clone + Send + Sync + 'static,
    T: Any + Send + Sync,
  {
    OperatorSubject::connect(self, |output| OfTypeObserver { output })
  }
}

impl<S: Observable<Item = AnyItem>> OfType for S {}
