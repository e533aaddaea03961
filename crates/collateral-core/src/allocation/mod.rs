//! Collateral allocation against a margin call.
//!
//! `optimize` is the single entry point: it translates the registry and
//! shortfall into a linear program, solves it with the in-crate simplex,
//! and hands back a decorated per-asset allocation inside the standard
//! computation envelope.

pub mod engine;
pub mod policy;
pub mod problem;
pub mod simplex;

pub use engine::{optimize, AllocationOutput};
pub use policy::DiversificationPolicy;
