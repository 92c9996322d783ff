//! Gold question/answer dataset

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::warn;

use newsrag_core::{Error, Result};

/// One gold question with its reference answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalExample {
    pub question: String,
    pub reference: String,
}

/// Read examples from CSV with `question` and `reference` columns.
///
/// Extra columns are ignored. Rows that fail to parse or have an empty
/// question are skipped with a warning.
pub fn read_examples_from<R: Read>(reader: R) -> Result<Vec<EvalExample>> {
    let mut reader = csv::Reader::from_reader(reader);

    let headers = reader.headers()?.clone();
    for column in ["question", "reference"] {
        if !headers.iter().any(|header| header == column) {
            return Err(Error::InvalidInput(format!(
                "Gold dataset is missing the '{}' column",
                column
            )));
        }
    }

    let mut examples = Vec::new();
    for (row, record) in reader.deserialize::<EvalExample>().enumerate() {
        match record {
            Ok(example) if example.question.trim().is_empty() => {
                warn!(row = row + 1, "Skipping example without a question");
            }
            Ok(example) => examples.push(example),
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => warn!(row = row + 1, error = %e, "Skipping unreadable example"),
        }
    }

    Ok(examples)
}

/// Read examples from a CSV file
pub fn read_examples<P: AsRef<Path>>(path: P) -> Result<Vec<EvalExample>> {
    let file = File::open(&path).map_err(|e| {
        Error::InvalidInput(format!("Failed to open {}: {}", path.as_ref().display(), e))
    })?;
    read_examples_from(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extra_columns_are_ignored() {
        let data = "id,question,reference,notes\n1,Who won?,Team A,easy\n";
        let examples = read_examples_from(data.as_bytes()).unwrap();

        assert_eq!(
            examples,
            vec![EvalExample {
                question: "Who won?".to_string(),
                reference: "Team A".to_string(),
            }]
        );
    }

    #[test]
    fn test_blank_questions_are_skipped() {
        let data = "question,reference\n,orphan answer\nWhat rose?,Rates\n";
        let examples = read_examples_from(data.as_bytes()).unwrap();
        assert_eq!(examples.len(), 1);
        assert_eq!(examples[0].question, "What rose?");
    }

    #[test]
    fn test_missing_reference_column() {
        let data = "question,answer\nWho won?,Team A\n";
        assert!(matches!(
            read_examples_from(data.as_bytes()),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(read_examples("does/not/exist.csv").is_err());
    }
}
