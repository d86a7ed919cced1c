//! Deliberate corruption of a serialized config document.
//!
//! Used to verify the remote validator rejects malformed submissions for the
//! right reason. Each numbered variant produces exactly one class of
//! structural defect; the affected field names depend on the active schema.

use serde_json::{Map, Value};

use crate::config::Schema;
use crate::error::ClientError;

/// Sentinel written by [`FaultVariant::NegativeTimeLimit`].
pub const NEGATIVE_TIME_SENTINEL: i64 = -100;

/// Numbered corruption variants, 1-6.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultVariant {
    /// 1: remove the time-limit field entirely.
    MissingTimeLimit,
    /// 2: set the time-limit field to a negative sentinel.
    NegativeTimeLimit,
    /// 3: remove the security-check flag field.
    MissingSecurityCheck,
    /// 4: replace the checkpoints value with a scalar string.
    CheckpointsNotObject,
    /// 5: drop every checkpoint's expected-output sub-field.
    MissingExpectedOutput,
    /// 6: replace checkpoints with an empty object.
    EmptyCheckpoints,
}

impl FaultVariant {
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(FaultVariant::MissingTimeLimit),
            2 => Some(FaultVariant::NegativeTimeLimit),
            3 => Some(FaultVariant::MissingSecurityCheck),
            4 => Some(FaultVariant::CheckpointsNotObject),
            5 => Some(FaultVariant::MissingExpectedOutput),
            6 => Some(FaultVariant::EmptyCheckpoints),
            _ => None,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            FaultVariant::MissingTimeLimit => 1,
            FaultVariant::NegativeTimeLimit => 2,
            FaultVariant::MissingSecurityCheck => 3,
            FaultVariant::CheckpointsNotObject => 4,
            FaultVariant::MissingExpectedOutput => 5,
            FaultVariant::EmptyCheckpoints => 6,
        }
    }
}

/// Mutate a parsed config document in place.
///
/// Fails if the value is not a top-level JSON object; a fault that cannot be
/// applied must never be silently dropped.
pub fn apply(config: &mut Value, schema: Schema, variant: FaultVariant) -> Result<(), ClientError> {
    let object = config.as_object_mut().ok_or_else(|| {
        ClientError::InvalidConfig("expected a top-level JSON object".to_string())
    })?;

    match variant {
        FaultVariant::MissingTimeLimit => {
            object.remove(schema.time_limit_key());
        }
        FaultVariant::NegativeTimeLimit => {
            object.insert(
                schema.time_limit_key().to_string(),
                Value::from(NEGATIVE_TIME_SENTINEL),
            );
        }
        FaultVariant::MissingSecurityCheck => {
            object.remove(schema.security_check_key());
        }
        FaultVariant::CheckpointsNotObject => {
            object.insert(
                "checkpoints".to_string(),
                Value::String("this should be an object".to_string()),
            );
        }
        FaultVariant::MissingExpectedOutput => strip_expected_outputs(object, schema),
        FaultVariant::EmptyCheckpoints => {
            object.insert("checkpoints".to_string(), Value::Object(Map::new()));
        }
    }
    Ok(())
}

/// Variant 5: mutate the existing checkpoints map in place so both schemas
/// end in the equivalent state (inputs kept, expected outputs gone).
fn strip_expected_outputs(object: &mut Map<String, Value>, schema: Schema) {
    let Some(checkpoints) = object.get_mut("checkpoints").and_then(Value::as_object_mut) else {
        return;
    };
    match schema {
        Schema::Legacy => {
            checkpoints.retain(|key, _| !key.ends_with("_out"));
        }
        Schema::Structured => {
            for (_, checkpoint) in checkpoints.iter_mut() {
                if let Some(entry) = checkpoint.as_object_mut() {
                    entry.remove("out");
                }
            }
        }
    }
}

/// Raw-string entry point: parse, delegate to [`apply`], re-serialize.
///
/// A caller-supplied document that is not valid JSON is a fatal configuration
/// error, surfaced before any transport begins.
pub fn apply_to_str(
    json: &str,
    schema: Schema,
    variant: FaultVariant,
) -> Result<String, ClientError> {
    let mut value: Value = serde_json::from_str(json)
        .map_err(|e| ClientError::InvalidConfig(format!("custom config is not valid JSON: {e}")))?;
    apply(&mut value, schema, variant)?;
    Ok(serde_json::to_string_pretty(&value)?)
}
