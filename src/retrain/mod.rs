//! Retraining decision engine
//!
//! Turns per-feature drift results into the boolean retrain signal consumed
//! by the calling automation.

mod policy;

pub use policy::{RetrainDecision, RetrainPolicy, NO_DRIFT_REASON};
