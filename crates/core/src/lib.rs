//! `xspace-core` -- business core of the X Space management console.
//!
//! Pure domain logic with no I/O: the visit data contract, the rate
//! configuration, the visit time-and-billing calculator, lifecycle
//! transitions that feed it, and the daily revenue summary built on it.
//! Persistence and presentation live outside this crate.

pub mod billing;
pub mod daily;
pub mod error;
pub mod lifecycle;
pub mod rates;
pub mod types;
pub mod validation;
pub mod visit;
