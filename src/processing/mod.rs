//! Input resolution and anchor watch evaluation

pub mod resolve;
pub mod evaluator;

pub use evaluator::{bow_position, evaluate, EvaluationResult};
pub use resolve::{resolve_anchor, resolve_vessel};
