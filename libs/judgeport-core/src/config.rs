//! Judge configuration document and its two wire schemas.
//!
//! The server's validator accepts the same logical document in two JSON
//! layouts: the legacy flat layout (`timeLimit`, checkpoints keyed
//! `"<i>_in"`/`"<i>_out"`) and the structured layout (`time_limit`,
//! checkpoints keyed by stringified index with `{in, out}` objects). Which
//! layout is active is agreed out-of-band; there is no negotiation on the
//! wire. All schema-specific key names live on [`Schema`] so no call site
//! re-derives them.

use serde_json::{json, Map, Value};

use crate::error::ClientError;
use crate::problem::Example;

/// Default memory limit carried by the structured schema, in KB.
pub const DEFAULT_MEMORY_LIMIT_KB: i64 = 32768;

/// The two JSON field-naming conventions understood by the judge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    Legacy,
    Structured,
}

impl Schema {
    pub fn time_limit_key(self) -> &'static str {
        match self {
            Schema::Legacy => "timeLimit",
            Schema::Structured => "time_limit",
        }
    }

    pub fn security_check_key(self) -> &'static str {
        match self {
            Schema::Legacy => "securityCheck",
            Schema::Structured => "enable_security_check",
        }
    }
}

/// How the judge compares actual output against expected output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompareMode {
    #[default]
    Strict,
    IgnoreSpaces,
    CaseInsensitive,
    FloatTolerant,
}

impl CompareMode {
    /// Integer code used on the wire.
    pub fn code(self) -> i64 {
        match self {
            CompareMode::Strict => 1,
            CompareMode::IgnoreSpaces => 2,
            CompareMode::CaseInsensitive => 3,
            CompareMode::FloatTolerant => 4,
        }
    }
}

/// One test case: 1-based index plus trimmed input/expected-output pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    pub index: u32,
    pub input: String,
    pub expected_output: String,
}

/// In-memory model of the judge configuration.
///
/// Constructed once per submission and never mutated after being handed to
/// the transport. Input/output strings are trimmed exactly once, at
/// construction; serialization never trims again.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDocument {
    pub time_limit_ms: i64,
    /// Structured schema only; the legacy layout has no memory field.
    pub memory_limit_kb: i64,
    pub security_check_enabled: bool,
    pub o2_enabled: bool,
    pub compare_mode: CompareMode,
    pub checkpoints: Vec<Checkpoint>,
}

impl ConfigDocument {
    /// Build a document from fetched problem examples.
    ///
    /// Checkpoint indices are assigned 1-based by position. An empty example
    /// sequence is rejected before any transport is attempted.
    pub fn from_examples(time_limit_ms: i64, examples: &[Example]) -> Result<Self, ClientError> {
        if examples.is_empty() {
            return Err(ClientError::EmptyCheckpoints);
        }
        let checkpoints = examples
            .iter()
            .enumerate()
            .map(|(i, example)| Checkpoint {
                index: i as u32 + 1,
                input: example.input.trim().to_string(),
                expected_output: example.output.trim().to_string(),
            })
            .collect();
        Ok(Self {
            time_limit_ms,
            memory_limit_kb: DEFAULT_MEMORY_LIMIT_KB,
            security_check_enabled: false,
            o2_enabled: false,
            compare_mode: CompareMode::Strict,
            checkpoints,
        })
    }

    /// Render the document as a JSON value in the chosen schema.
    pub fn to_json(&self, schema: Schema) -> Value {
        match schema {
            Schema::Legacy => self.to_legacy_json(),
            Schema::Structured => self.to_structured_json(),
        }
    }

    /// Pretty-printed JSON in the chosen schema, ready for the wire.
    pub fn serialize(&self, schema: Schema) -> Result<String, ClientError> {
        Ok(serde_json::to_string_pretty(&self.to_json(schema))?)
    }

    fn to_legacy_json(&self) -> Value {
        let mut checkpoints = Map::new();
        for cp in &self.checkpoints {
            checkpoints.insert(format!("{}_in", cp.index), json!(cp.input));
            checkpoints.insert(format!("{}_out", cp.index), json!(cp.expected_output));
        }

        let mut config = Map::new();
        config.insert("timeLimit".to_string(), json!(self.time_limit_ms));
        config.insert("checkpoints".to_string(), Value::Object(checkpoints));
        config.insert("securityCheck".to_string(), json!(self.security_check_enabled));
        config.insert("enableO2".to_string(), json!(self.o2_enabled));
        config.insert("compareMode".to_string(), json!(self.compare_mode.code()));
        Value::Object(config)
    }

    fn to_structured_json(&self) -> Value {
        let mut checkpoints = Map::new();
        for cp in &self.checkpoints {
            checkpoints.insert(
                cp.index.to_string(),
                json!({ "in": cp.input, "out": cp.expected_output }),
            );
        }

        let mut config = Map::new();
        config.insert("time_limit".to_string(), json!(self.time_limit_ms));
        config.insert("mem_limit".to_string(), json!(self.memory_limit_kb));
        config.insert(
            "enable_security_check".to_string(),
            json!(self.security_check_enabled),
        );
        config.insert("enable_o2".to_string(), json!(self.o2_enabled));
        config.insert("compare_mode".to_string(), json!(self.compare_mode.code()));
        config.insert("checkpoints".to_string(), Value::Object(checkpoints));
        Value::Object(config)
    }
}
