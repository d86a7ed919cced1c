//! Decoding of streamed judge response messages.
//!
//! The server reports checkpoints in one of two JSON shapes, detected per
//! message: the structured shape nests `{res, time, mem}` objects under a
//! `checkpoints` field, the legacy shape scatters `"<i>_res"`/`"<i>_time"`/
//! `"<i>_mem"` keys at the top level. Messages that fail to parse are logged
//! and skipped; one malformed checkpoint report must not void an otherwise
//! successful run. The same tolerance applies inside a structured message:
//! detection only inspects the first checkpoint entry, and a later entry
//! without an integer `res` is skipped on its own while the surrounding
//! entries still produce records and count toward the totals.

use serde_json::{Map, Value};
use tracing::warn;

use crate::verdict::ResultVocabulary;

/// Status code meaning the checkpoint passed.
pub const ACCEPTED_CODE: i64 = 1;

/// Outcome of one checkpoint as reported by one response message.
///
/// The index preserves the original response key and is not necessarily
/// numeric-sortable.
#[derive(Debug, Clone, PartialEq)]
pub struct TestCheckpointResult {
    pub index: String,
    pub status_code: i64,
    pub status_text: String,
    pub time_used_ms: f64,
    pub memory_used_kb: i64,
}

/// Aggregate over every checkpoint record of a submission.
///
/// Records keep message arrival order, then field-iteration order within a
/// message. Duplicate indices across messages are not deduplicated; every
/// occurrence counts.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EvaluationSummary {
    pub checkpoint_results: Vec<TestCheckpointResult>,
    pub accepted_count: usize,
    pub total_count: usize,
    pub average_time_ms: f64,
    pub average_memory_kb: i64,
}

/// Fold a batch of raw response messages into a summary.
pub fn decode(messages: &[String], vocabulary: &ResultVocabulary) -> EvaluationSummary {
    let mut results = Vec::new();

    for message in messages {
        let value: Value = match serde_json::from_str(message) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, raw = %message, "skipping unparsable response message");
                continue;
            }
        };
        let Some(fields) = value.as_object() else {
            warn!(raw = %message, "skipping non-object response message");
            continue;
        };

        match structured_checkpoints(fields) {
            Some(checkpoints) => decode_structured(checkpoints, vocabulary, &mut results),
            None => decode_legacy(fields, vocabulary, &mut results),
        }
    }

    summarize(results)
}

/// Schema detection: a message is structured iff its `checkpoints` field is
/// an object whose first member (by iteration order) is itself an object
/// carrying all of `res`, `time`, `mem`.
fn structured_checkpoints(fields: &Map<String, Value>) -> Option<&Map<String, Value>> {
    let checkpoints = fields.get("checkpoints")?.as_object()?;
    let (_, first) = checkpoints.iter().next()?;
    let first = first.as_object()?;
    if first.contains_key("res") && first.contains_key("time") && first.contains_key("mem") {
        Some(checkpoints)
    } else {
        None
    }
}

fn decode_structured(
    checkpoints: &Map<String, Value>,
    vocabulary: &ResultVocabulary,
    results: &mut Vec<TestCheckpointResult>,
) {
    for (index, entry) in checkpoints {
        let Some(entry) = entry.as_object() else {
            warn!(index = %index, "skipping checkpoint entry that is not an object");
            continue;
        };
        let Some(status_code) = entry.get("res").and_then(Value::as_i64) else {
            warn!(index = %index, "skipping checkpoint entry without integer res");
            continue;
        };
        results.push(TestCheckpointResult {
            index: index.clone(),
            status_code,
            status_text: vocabulary.resolve(status_code).to_string(),
            time_used_ms: entry.get("time").and_then(Value::as_f64).unwrap_or(0.0),
            memory_used_kb: entry.get("mem").and_then(Value::as_i64).unwrap_or(0),
        });
    }
}

fn decode_legacy(
    fields: &Map<String, Value>,
    vocabulary: &ResultVocabulary,
    results: &mut Vec<TestCheckpointResult>,
) {
    for (key, value) in fields {
        if !key.ends_with("_res") {
            continue;
        }
        // The index is the substring before the first underscore.
        let index = key.split('_').next().unwrap_or(key.as_str());
        let Some(status_code) = value.as_i64() else {
            warn!(key = %key, "skipping result field with non-integer status");
            continue;
        };
        results.push(TestCheckpointResult {
            index: index.to_string(),
            status_code,
            status_text: vocabulary.resolve(status_code).to_string(),
            time_used_ms: fields
                .get(&format!("{index}_time"))
                .and_then(Value::as_f64)
                .unwrap_or(0.0),
            memory_used_kb: fields
                .get(&format!("{index}_mem"))
                .and_then(Value::as_i64)
                .unwrap_or(0),
        });
    }
}

fn summarize(results: Vec<TestCheckpointResult>) -> EvaluationSummary {
    let total_count = results.len();
    let accepted_count = results
        .iter()
        .filter(|r| r.status_code == ACCEPTED_CODE)
        .count();

    let (average_time_ms, average_memory_kb) = if total_count == 0 {
        (0.0, 0)
    } else {
        let total_time: f64 = results.iter().map(|r| r.time_used_ms).sum();
        let total_memory: i64 = results.iter().map(|r| r.memory_used_kb).sum();
        (
            total_time / total_count as f64,
            total_memory / total_count as i64,
        )
    };

    EvaluationSummary {
        checkpoint_results: results,
        accepted_count,
        total_count,
        average_time_ms,
        average_memory_kb,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn legacy_pair_of_messages_aggregates() {
        let vocab = ResultVocabulary::from_entries([(1, "Accepted"), (-3, "Wrong Answer")]);
        let batch = messages(&[r#"{"1_res":1,"1_time":120}"#, r#"{"2_res":-3,"2_time":340}"#]);

        let summary = decode(&batch, &vocab);

        assert_eq!(summary.total_count, 2);
        assert_eq!(summary.accepted_count, 1);
        assert_eq!(summary.average_time_ms, 230.0);
        assert_eq!(summary.checkpoint_results[0].index, "1");
        assert_eq!(summary.checkpoint_results[0].status_text, "Accepted");
        assert_eq!(summary.checkpoint_results[1].index, "2");
        assert_eq!(summary.checkpoint_results[1].status_text, "Wrong Answer");
    }

    #[test]
    fn structured_message_decodes_all_fields() {
        let vocab = ResultVocabulary::default();
        let batch = messages(&[r#"{"checkpoints":{"1":{"res":1,"time":95.5,"mem":1024}}}"#]);

        let summary = decode(&batch, &vocab);

        assert_eq!(summary.total_count, 1);
        let record = &summary.checkpoint_results[0];
        assert_eq!(record.index, "1");
        assert_eq!(record.status_text, "Accepted");
        assert_eq!(record.time_used_ms, 95.5);
        assert_eq!(record.memory_used_kb, 1024);
    }

    #[test]
    fn unparsable_message_is_skipped_not_fatal() {
        let vocab = ResultVocabulary::default();
        let batch = messages(&["this is not json", r#"{"1_res":1,"1_time":50}"#]);

        let summary = decode(&batch, &vocab);

        assert_eq!(summary.total_count, 1);
        assert_eq!(summary.accepted_count, 1);
        assert_eq!(summary.average_time_ms, 50.0);
    }

    #[test]
    fn equivalent_schemas_produce_equal_totals() {
        let vocab = ResultVocabulary::default();
        let legacy = messages(&[
            r#"{"1_res":1,"1_time":100,"1_mem":2048,"2_res":-3,"2_time":200,"2_mem":1024}"#,
        ]);
        let structured = messages(&[concat!(
            r#"{"checkpoints":{"1":{"res":1,"time":100,"mem":2048},"#,
            r#""2":{"res":-3,"time":200,"mem":1024}}}"#
        )]);

        let a = decode(&legacy, &vocab);
        let b = decode(&structured, &vocab);

        assert_eq!(a.total_count, b.total_count);
        assert_eq!(a.accepted_count, b.accepted_count);
        assert_eq!(a.average_time_ms, b.average_time_ms);
        assert_eq!(a.average_memory_kb, b.average_memory_kb);
    }

    #[test]
    fn decoding_is_idempotent() {
        let vocab = ResultVocabulary::default();
        let batch = messages(&[
            r#"{"1_res":1,"1_time":10,"1_mem":512}"#,
            r#"{"checkpoints":{"2":{"res":4,"time":20,"mem":256}}}"#,
        ]);

        assert_eq!(decode(&batch, &vocab), decode(&batch, &vocab));
    }

    #[test]
    fn duplicate_indices_are_not_deduplicated() {
        let vocab = ResultVocabulary::default();
        let batch = messages(&[r#"{"1_res":1,"1_time":10}"#, r#"{"1_res":1,"1_time":30}"#]);

        let summary = decode(&batch, &vocab);

        assert_eq!(summary.total_count, 2);
        assert_eq!(summary.accepted_count, 2);
        assert_eq!(summary.average_time_ms, 20.0);
    }

    #[test]
    fn legacy_missing_time_and_mem_default_to_zero() {
        let vocab = ResultVocabulary::default();
        let summary = decode(&messages(&[r#"{"7_res":-4}"#]), &vocab);

        let record = &summary.checkpoint_results[0];
        assert_eq!(record.index, "7");
        assert_eq!(record.status_text, "Compile Error");
        assert_eq!(record.time_used_ms, 0.0);
        assert_eq!(record.memory_used_kb, 0);
    }

    #[test]
    fn unknown_status_code_gets_generic_label() {
        let vocab = ResultVocabulary::default();
        let summary = decode(&messages(&[r#"{"1_res":42,"1_time":5}"#]), &vocab);

        assert_eq!(summary.checkpoint_results[0].status_text, "Unknown Status");
        assert_eq!(summary.accepted_count, 0);
    }

    #[test]
    fn empty_batch_has_zero_averages() {
        let summary = decode(&[], &ResultVocabulary::default());

        assert_eq!(summary.total_count, 0);
        assert_eq!(summary.average_time_ms, 0.0);
        assert_eq!(summary.average_memory_kb, 0);
    }

    #[test]
    fn malformed_structured_entry_skips_only_itself() {
        let vocab = ResultVocabulary::default();
        let batch = messages(&[concat!(
            r#"{"checkpoints":{"1":{"res":1,"time":10,"mem":64},"#,
            r#""2":{"time":20,"mem":64},"3":{"res":-3,"time":30,"mem":64}}}"#
        )]);

        let summary = decode(&batch, &vocab);

        assert_eq!(summary.total_count, 2);
        assert_eq!(summary.accepted_count, 1);
        let order: Vec<&str> = summary
            .checkpoint_results
            .iter()
            .map(|r| r.index.as_str())
            .collect();
        assert_eq!(order, vec!["1", "3"]);
        assert_eq!(summary.average_time_ms, 20.0);
    }

    #[test]
    fn incomplete_first_member_falls_back_to_legacy() {
        // checkpoints lacks "mem" on its first member, so detection treats
        // the message as legacy; no top-level "_res" keys means no records.
        let vocab = ResultVocabulary::default();
        let batch = messages(&[r#"{"checkpoints":{"1":{"res":1,"time":10}}}"#]);

        let summary = decode(&batch, &vocab);

        assert_eq!(summary.total_count, 0);
    }

    #[test]
    fn record_order_follows_arrival_then_field_order() {
        let vocab = ResultVocabulary::default();
        let batch = messages(&[
            r#"{"2_res":1,"2_time":1,"1_res":1,"1_time":1}"#,
            r#"{"3_res":1,"3_time":1}"#,
        ]);

        let summary = decode(&batch, &vocab);
        let order: Vec<&str> = summary
            .checkpoint_results
            .iter()
            .map(|r| r.index.as_str())
            .collect();
        assert_eq!(order, vec!["2", "1", "3"]);
    }
}
