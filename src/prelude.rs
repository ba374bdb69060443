pub use crate::{
  error::DisposedError,
  observable::{Observable, SubscribeAll, SubscribeComp, SubscribeErr, SubscribeNext},
  observer::{Observer, ObserverAll, ObserverComp, ObserverErr, ObserverNext},
  ops::{AnyItem, Filter, Map, OfType, OperatorSubject},
  subject::{Subject, SubjectSubscription},
  subscription::{
    ActionSubscription, BoxedSubscription, CompositeSubscription, StableCompositeSubscription,
    Subscription, SubscriptionGuard,
  },
};
