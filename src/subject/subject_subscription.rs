use std::sync::Arc;

use super::{subject_core::SubjectCore, subscribers::SubscriberEntry};
use crate::subscription::Subscription;

/// The handle returned by subscribing to a [`Subject`](super::Subject).
///
/// Unsubscribing flips the entry's disposed flag first, which immediately
/// stops delivery even when a broadcast over an older snapshot is in flight,
/// then excises the entry from the registry. Safe to call from within the
/// observer's own callback; the flag wins the flip exactly once no matter how
/// handles race.
pub struct SubjectSubscription<Item, Err> {
  registration: Option<Registration<Item, Err>>,
}

struct Registration<Item, Err> {
  core: Arc<SubjectCore<Item, Err>>,
  entry: Arc<SubscriberEntry<Item, Err>>,
}

impl<Item, Err> SubjectSubscription<Item, Err> {
  /// The closed token handed out when a terminated subject replays its
  /// terminal notification instead of registering.
  pub(crate) fn inert() -> Self { SubjectSubscription { registration: None } }

  pub(crate) fn registered(
    core: Arc<SubjectCore<Item, Err>>,
    entry: Arc<SubscriberEntry<Item, Err>>,
  ) -> Self {
    SubjectSubscription { registration: Some(Registration { core, entry }) }
  }
}

impl<Item, Err> Subscription for SubjectSubscription<Item, Err> {
  fn unsubscribe(self) {
    if let Some(Registration { core, entry }) = self.registration {
      if entry.mark_disposed() {
        core.remove_entry(&entry);
      }
    }
  }

  fn is_closed(&self) -> bool {
    self
      .registration
      .as_ref()
      .map_or(true, |r| r.entry.is_disposed())
  }
}
