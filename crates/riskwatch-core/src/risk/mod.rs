//! Risk engine
//!
//! `evaluate` turns a snapshot into a score, a tier and the ordered list of
//! rules that fired. It never fails; missing input scores as the safe default.

pub mod engine;
pub mod model;
pub mod rules;

pub use engine::{evaluate, evaluate_fields};
pub use model::{RiskLevel, RiskResult};
