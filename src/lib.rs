//! A minimal multicast subject with lock-free subscriber management.
//!
//! The crate is built around one concurrent primitive, [`Subject`]: many
//! producers push values, errors, and completion into it; many independent
//! consumers subscribe and receive every notification emitted after their
//! registration, synchronously on the producer's thread. On top of that sit
//! the transformation stages [`filter`](ops::Filter::filter),
//! [`map`](ops::Map::map), and [`of_type`](ops::OfType::of_type), and a small
//! family of disposal primitives for deterministic teardown.
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//!
//! use rxlite::prelude::*;
//!
//! let numbers = Subject::<i32, ()>::new();
//! let evens_doubled = numbers
//!   .clone()
//!   .filter(|v| v % 2 == 0)
//!   .unwrap()
//!   .map(|v| v * 2)
//!   .unwrap();
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = seen.clone();
//! let subscription = evens_doubled
//!   .clone()
//!   .subscribe(move |v| sink.lock().unwrap().push(v))
//!   .unwrap();
//!
//! for v in 1..=6 {
//!   numbers.next(v).unwrap();
//! }
//! numbers.complete().unwrap();
//!
//! assert_eq!(*seen.lock().unwrap(), vec![4, 8, 12]);
//! subscription.unsubscribe();
//! ```

pub mod error;
pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod subject;
pub mod subscription;

pub use prelude::*;
