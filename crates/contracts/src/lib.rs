//! # Contracts
//!
//! Frozen interface contracts shared by every crate of the shipper.
//! Business crates depend on this crate only; reverse dependencies are prohibited.
//!
//! ## Acknowledgement model
//! - A [`Batch`] is the unit of work whose outcome is reported upstream exactly once
//! - Every report site holds an optional [`SignalerRef`] and calls exactly one of
//!   [`Signaler::completed`] / [`Signaler::failed`]
//! - Outcomes are binary; error details never travel through a signaler

mod batch;
mod blueprint;
mod error;
mod output;
mod signaler;

pub use batch::*;
pub use blueprint::*;
pub use error::*;
pub use output::*;
pub use signaler::{Outcome, Signaler, SignalerRef};
