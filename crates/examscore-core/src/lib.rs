//! examscore-core: Answer evaluation, score rollups, and report aggregation.
//!
//! This crate defines the exam data model, the multiple-choice answer
//! evaluator, and the report aggregator that turns persisted exam responses
//! into a candidate report.

pub mod analysis;
pub mod error;
pub mod evaluator;
pub mod insights;
pub mod model;
pub mod parser;
pub mod report;
pub mod similarity;
pub mod skills;
pub mod statistics;
pub mod traits;
