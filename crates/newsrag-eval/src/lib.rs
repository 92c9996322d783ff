//! Answer scoring for newsrag
//!
//! Runs gold questions through a RAG engine and scores each answer against
//! its reference with BLEU, ROUGE-L and embedding cosine similarity.

mod dataset;
mod metrics;
mod report;
mod runner;


pub use dataset::{read_examples, read_examples_from, EvalExample};
pub use metrics::{bleu, embedding_cosine, mean, rouge_l, tokenize, BLEU_EPSILON, BLEU_MAX_ORDER};
pub use report::{EvalRecord, EvalReport, EvalSummary};
pub use runner::Evaluator;
