//! Testing utilities for bookflow reducers.
//!
//! Provides the [`ReducerTest`] Given/When/Then harness, effect assertion
//! helpers, and a [`FixedClock`] for deterministic time in tests.

pub mod clock;

pub use clock::{test_clock, FixedClock};
pub use reducer_test::{assertions, ReducerTest};
