//! Per-example records, run summary and CSV report

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use newsrag_core::Result;

use crate::metrics::mean;

/// Scores for one gold example
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalRecord {
    pub question: String,
    pub reference: String,
    pub answer: String,
    pub bleu: f64,
    pub rouge_l: f64,
    pub cosine: f64,
    /// Number of chunks the answer was grounded on
    pub retrieved: usize,
    pub error: Option<String>,
}

impl EvalRecord {
    /// Zero-score record for an example that could not be answered or scored
    pub fn failed(question: &str, reference: &str, error: impl Into<String>) -> Self {
        Self {
            question: question.to_string(),
            reference: reference.to_string(),
            answer: String::new(),
            bleu: 0.0,
            rouge_l: 0.0,
            cosine: 0.0,
            retrieved: 0,
            error: Some(error.into()),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// Aggregate over one run. Means cover successful examples only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvalSummary {
    pub examples: usize,
    pub failures: usize,
    pub mean_bleu: f64,
    pub mean_rouge_l: f64,
    pub mean_cosine: f64,
}

impl EvalSummary {
    pub fn from_records(records: &[EvalRecord]) -> Self {
        let succeeded: Vec<&EvalRecord> = records.iter().filter(|r| !r.is_failure()).collect();
        let scores = |score: fn(&EvalRecord) -> f64| -> Vec<f64> {
            succeeded.iter().map(|record| score(record)).collect()
        };

        Self {
            examples: records.len(),
            failures: records.len() - succeeded.len(),
            mean_bleu: mean(&scores(|r| r.bleu)),
            mean_rouge_l: mean(&scores(|r| r.rouge_l)),
            mean_cosine: mean(&scores(|r| r.cosine)),
        }
    }
}

/// Records of one run with their summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalReport {
    pub records: Vec<EvalRecord>,
    pub summary: EvalSummary,
}

impl EvalReport {
    pub fn new(records: Vec<EvalRecord>) -> Self {
        let summary = EvalSummary::from_records(&records);
        Self { records, summary }
    }

    /// Write one CSV row per record
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);
        for record in &self.records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Write the CSV report to `path`, replacing any existing file
    pub fn write_csv_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        self.write_csv(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(bleu: f64, rouge_l: f64, cosine: f64) -> EvalRecord {
        EvalRecord {
            question: "q".to_string(),
            reference: "r".to_string(),
            answer: "a".to_string(),
            bleu,
            rouge_l,
            cosine,
            retrieved: 5,
            error: None,
        }
    }

    #[test]
    fn test_summary_skips_failures() {
        let records = vec![
            scored(0.2, 0.4, 0.8),
            EvalRecord::failed("q", "r", "timeout"),
            scored(0.4, 0.6, 1.0),
        ];

        let summary = EvalSummary::from_records(&records);
        assert_eq!(summary.examples, 3);
        assert_eq!(summary.failures, 1);
        assert!((summary.mean_bleu - 0.3).abs() < 1e-9);
        assert!((summary.mean_rouge_l - 0.5).abs() < 1e-9);
        assert!((summary.mean_cosine - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_empty_summary() {
        assert_eq!(EvalSummary::from_records(&[]), EvalSummary::default());
    }

    #[test]
    fn test_csv_has_header_and_empty_error() {
        let report = EvalReport::new(vec![scored(0.5, 0.25, 1.0)]);
        let mut buffer = Vec::new();
        report.write_csv(&mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("question,reference,answer,bleu,rouge_l,cosine,retrieved,error")
        );
        assert_eq!(lines.next(), Some("q,r,a,0.5,0.25,1.0,5,"));
    }
}
