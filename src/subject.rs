//! The broadcast subject
//!
//! [`Subject`] is the multicast core of the crate: a combined producer sink
//! and observable source. Producers push with `next`/`error`/`complete`;
//! consumers register through the [`Observable`](crate::observable::Observable)
//! surface and receive every notification emitted after their registration.
//!
//! Subscriber management is lock-free: the registry is an immutable snapshot
//! behind an atomic reference, replaced wholesale by a compare-and-retry loop
//! on every subscribe/unsubscribe, so the hot fan-out path is one atomic load
//! plus iteration.

pub mod subject_core;
pub mod subject_subscription;
mod subscribers;

pub use subject_core::Subject;
pub use subject_subscription::SubjectSubscription;
