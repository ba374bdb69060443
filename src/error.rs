use thiserror::Error;

/// The disposed-object condition.
///
/// Returned by every producer or subscription operation that reaches a subject
/// after [`Subject::dispose`](crate::subject::Subject::dispose) ran. Disposal
/// means the caller tore the subject down, so a later operation is a lifetime
/// bug on the caller's side and is always surfaced, never silently ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("operation on a disposed subject")]
pub struct DisposedError;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn display_names_the_condition() {
    assert_eq!(DisposedError.to_string(), "operation on a disposed subject");
  }
}
