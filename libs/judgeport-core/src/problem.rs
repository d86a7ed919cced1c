//! Problem-data collaborator interface and a file-backed implementation.
//!
//! A [`ProblemSource`] hands back problem metadata plus the ordered example
//! pairs a submission is judged against. The production deployment fronts a
//! relational store; that backend is out of scope here, so the crate ships
//! [`ProblemBank`], a JSON-file-backed source usable by the CLI and by
//! tests.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ClientError;

/// One example input/output pair, in problem order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub input: String,
    pub output: String,
}

/// Problem metadata plus its ordered examples.
#[derive(Debug, Clone)]
pub struct ProblemData {
    /// Free-form metadata fields; must carry a numeric `time_limit`.
    pub metadata: Map<String, Value>,
    pub examples: Vec<Example>,
}

impl ProblemData {
    pub fn time_limit_ms(&self) -> Result<i64, ClientError> {
        self.metadata
            .get("time_limit")
            .and_then(Value::as_i64)
            .ok_or(ClientError::MissingTimeLimit)
    }

    pub fn title(&self) -> &str {
        self.metadata
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or("<untitled>")
    }
}

/// Anything that can look up a problem by id.
pub trait ProblemSource {
    fn fetch(&self, problem_id: u32) -> Result<ProblemData, ClientError>;
}

#[derive(Debug, Deserialize)]
struct BankEntry {
    problem_id: u32,
    examples: Vec<Example>,
    #[serde(flatten)]
    metadata: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct BankJson {
    problems: Vec<BankEntry>,
}

/// Problem source backed by a local `problems.json` file.
pub struct ProblemBank {
    problems: HashMap<u32, ProblemData>,
}

impl ProblemBank {
    pub fn load(path: &Path) -> Result<Self, ClientError> {
        if !path.exists() {
            return Err(ClientError::BankMissing(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        let bank: BankJson = serde_json::from_str(&content)?;

        let mut problems = HashMap::new();
        for entry in bank.problems {
            problems.insert(
                entry.problem_id,
                ProblemData {
                    metadata: entry.metadata,
                    examples: entry.examples,
                },
            );
        }
        Ok(Self { problems })
    }
}

impl ProblemSource for ProblemBank {
    fn fetch(&self, problem_id: u32) -> Result<ProblemData, ClientError> {
        let data = self
            .problems
            .get(&problem_id)
            .cloned()
            .ok_or(ClientError::ProblemNotFound(problem_id))?;
        if data.examples.is_empty() {
            return Err(ClientError::NoExamples(problem_id));
        }
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BANK: &str = r#"{
        "problems": [
            {
                "problem_id": 1,
                "title": "A + B",
                "time_limit": 1000,
                "examples": [
                    {"input": "1 2", "output": "3"},
                    {"input": "4 5", "output": "9"}
                ]
            },
            {
                "problem_id": 2,
                "title": "No Examples",
                "time_limit": 500,
                "examples": []
            },
            {
                "problem_id": 3,
                "title": "No Time Limit",
                "examples": [
                    {"input": "x", "output": "y"}
                ]
            }
        ]
    }"#;

    fn bank() -> ProblemBank {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("problems.json");
        std::fs::write(&path, BANK).unwrap();
        ProblemBank::load(&path).unwrap()
    }

    #[test]
    fn fetch_returns_metadata_and_ordered_examples() {
        let data = bank().fetch(1).unwrap();
        assert_eq!(data.title(), "A + B");
        assert_eq!(data.time_limit_ms().unwrap(), 1000);
        assert_eq!(data.examples.len(), 2);
        assert_eq!(data.examples[0].input, "1 2");
        assert_eq!(data.examples[1].output, "9");
    }

    #[test]
    fn unknown_problem_is_reported() {
        let result = bank().fetch(99);
        assert!(matches!(result, Err(ClientError::ProblemNotFound(99))));
    }

    #[test]
    fn empty_example_set_is_reported() {
        let result = bank().fetch(2);
        assert!(matches!(result, Err(ClientError::NoExamples(2))));
    }

    #[test]
    fn missing_time_limit_is_reported() {
        let data = bank().fetch(3).unwrap();
        assert!(matches!(
            data.time_limit_ms(),
            Err(ClientError::MissingTimeLimit)
        ));
    }

    #[test]
    fn missing_bank_file_is_reported() {
        let result = ProblemBank::load(Path::new("/nonexistent/problems.json"));
        assert!(matches!(result, Err(ClientError::BankMissing(_))));
    }
}
