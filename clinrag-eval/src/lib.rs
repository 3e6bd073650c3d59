//! # clinrag-eval
//!
//! Evaluation harness for [`clinrag`] pipelines.
//!
//! Runs a labeled question set through the answer composer, collects
//! `(question, answer, contexts, ground_truth)` records and scores them on
//! faithfulness, answer relevancy, context precision and context recall.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use clinrag_eval::{EvaluationHarness, LexicalEvaluator};
//!
//! let harness = EvaluationHarness::new(pipeline.composer(), Arc::new(LexicalEvaluator::new()));
//! let report = harness.run_file("data/clinical_testset.jsonl").await?;
//! println!("{report}");
//! ```

#![warn(missing_docs)]

pub mod dataset;
pub mod error;
pub mod harness;
pub mod metrics;
pub mod record;
pub mod report;

pub use dataset::{EvalCase, load_dataset};
pub use error::{EvalError, Result};
pub use harness::EvaluationHarness;
pub use metrics::{LexicalEvaluator, MetricEvaluator, MetricScores};
pub use record::EvaluationRecord;
pub use report::{EvaluationReport, EvaluationRow, ScoreSummary};
