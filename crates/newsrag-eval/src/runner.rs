//! Sequential evaluation of a RAG engine over gold examples

use std::sync::Arc;
use tracing::{info, warn};

use newsrag_core::{Embedder, Error, RAGEngine, RAGQuery, Result};

use crate::dataset::EvalExample;
use crate::metrics::{bleu, embedding_cosine, rouge_l};
use crate::report::{EvalRecord, EvalReport};

/// Runs every gold question through the engine and scores the answers
pub struct Evaluator<R: RAGEngine, E: Embedder> {
    engine: Arc<R>,
    embedder: Arc<E>,
    top_k: usize,
}

impl<R: RAGEngine, E: Embedder> Evaluator<R, E> {
    /// `embedder` is used for the answer/reference cosine score
    pub fn new(engine: Arc<R>, embedder: Arc<E>) -> Self {
        Self {
            engine,
            embedder,
            top_k: RAGQuery::default().top_k,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Answer and score one example
    pub async fn evaluate_example(&self, example: &EvalExample) -> Result<EvalRecord> {
        let query = RAGQuery {
            top_k: self.top_k,
            ..RAGQuery::new(example.question.clone())
        };
        let answer = self.engine.answer(&query).await?;

        let vectors = self
            .embedder
            .embed_batch(&[answer.text.clone(), example.reference.clone()])
            .await?;
        let cosine = match vectors.as_slice() {
            [answer_vector, reference_vector] => embedding_cosine(answer_vector, reference_vector),
            _ => {
                return Err(Error::Embedding(format!(
                    "Expected 2 embeddings, received {}",
                    vectors.len()
                )));
            }
        };

        Ok(EvalRecord {
            question: example.question.clone(),
            reference: example.reference.clone(),
            bleu: bleu(&answer.text, &example.reference),
            rouge_l: rouge_l(&answer.text, &example.reference),
            cosine,
            retrieved: answer.chunks.len(),
            answer: answer.text,
            error: None,
        })
    }

    /// Evaluate all examples in order. A failing example is recorded with
    /// zero scores and the run continues.
    pub async fn run(&self, examples: &[EvalExample]) -> EvalReport {
        let mut records = Vec::with_capacity(examples.len());

        for (index, example) in examples.iter().enumerate() {
            let record = match self.evaluate_example(example).await {
                Ok(record) => record,
                Err(e) => {
                    warn!(example = index + 1, question = %example.question, error = %e, "Evaluation failed");
                    EvalRecord::failed(&example.question, &example.reference, e.to_string())
                }
            };
            records.push(record);
        }

        let report = EvalReport::new(records);
        info!(
            examples = report.summary.examples,
            failures = report.summary.failures,
            bleu = report.summary.mean_bleu,
            rouge_l = report.summary.mean_rouge_l,
            cosine = report.summary.mean_cosine,
            "Evaluation finished"
        );

        report
    }
}
