//! Streaming response normalization
//!
//! [`StreamNormalizer`] maps one provider chunk at a time onto canonical
//! [`StreamEvent`]s; [`normalize_stream`] drives it over an async chunk source.
//!
//! Per chunk, the first choice's delta is checked against [`DELTA_FIELDS`] in
//! order. A field is emitted only when its value is a string; anything else is
//! dropped and counted, as is a `choices` or `delta` value of the wrong shape.
//! A usage block, when present, yields exactly one usage
//! event after the delta events.

use super::types::StreamChunk;
use crate::core_types::events::{StreamEvent, UsageEvent};
use crate::error::{LlmError, LlmResult};
use crate::logging::{log_debug, log_warn};
use futures_util::stream::{self, Stream, StreamExt};
use serde_json::{Map, Value};
use std::pin::Pin;

/// Normalized event stream handed to callers
pub type EventStream = Pin<Box<dyn Stream<Item = LlmResult<StreamEvent>> + Send>>;

/// Canonical kind a delta field maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaKind {
    Reasoning,
    Text,
}

/// Delta fields in emission priority order.
///
/// Reasoning aliases used by different backends come first, visible content last.
pub const DELTA_FIELDS: &[(&str, DeltaKind)] = &[
    ("reasoning", DeltaKind::Reasoning),
    ("thinking", DeltaKind::Reasoning),
    ("reasoning_content", DeltaKind::Reasoning),
    ("content", DeltaKind::Text),
];

/// Where the normalizer is in its lifecycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StreamPhase {
    #[default]
    NotStarted,
    Streaming,
    Completed,
}

/// Per-stream diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub chunks_seen: u64,
    pub events_emitted: u64,
    /// Choice, delta or usage fields dropped because of an unexpected JSON type
    pub dropped_fields: u64,
}

#[derive(Debug, Default)]
pub struct StreamNormalizer {
    phase: StreamPhase,
    stats: StreamStats,
}

impl StreamNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> StreamPhase {
        self.phase
    }

    pub fn stats(&self) -> StreamStats {
        self.stats
    }

    /// Map one chunk to zero or more events.
    ///
    /// A chunk with no choices but a usage block is the terminal chunk and
    /// completes the stream. Chunks arriving after completion yield nothing.
    pub fn process_chunk(&mut self, chunk: &StreamChunk) -> Vec<StreamEvent> {
        if self.phase == StreamPhase::Completed {
            return Vec::new();
        }
        self.phase = StreamPhase::Streaming;
        self.stats.chunks_seen += 1;

        let mut events = Vec::new();

        match &chunk.choices {
            Value::Null => {}
            Value::Array(choices) => {
                if let Some(choice) = choices.first() {
                    self.classify_choice(choice, &mut events);
                }
            }
            other => self.record_drop("choices", other),
        }

        if let Some(usage) = &chunk.usage {
            match usage_event(usage) {
                Some(event) => events.push(StreamEvent::Usage(event)),
                None => self.record_drop("usage", usage),
            }
        }

        self.stats.events_emitted += events.len() as u64;

        if chunk.has_no_choices() && chunk.usage.is_some() {
            self.finish();
        }

        events
    }

    /// Mark the stream completed and log its diagnostics (once).
    pub fn finish(&mut self) {
        if self.phase == StreamPhase::Completed {
            return;
        }
        self.phase = StreamPhase::Completed;

        log_debug!(
            chunks_seen = self.stats.chunks_seen,
            events_emitted = self.stats.events_emitted,
            dropped_fields = self.stats.dropped_fields,
            "Provider stream completed"
        );
        if self.stats.dropped_fields > 0 {
            log_warn!(
                dropped_fields = self.stats.dropped_fields,
                "Provider stream contained fields with unexpected types"
            );
        }
    }

    fn classify_choice(&mut self, choice: &Value, events: &mut Vec<StreamEvent>) {
        let Some(choice) = choice.as_object() else {
            self.record_drop("choice", choice);
            return;
        };
        match choice.get("delta") {
            None | Some(Value::Null) => {}
            Some(Value::Object(delta)) => self.classify_delta(delta, events),
            Some(other) => self.record_drop("delta", other),
        }
    }

    fn classify_delta(&mut self, delta: &Map<String, Value>, events: &mut Vec<StreamEvent>) {
        for (field, kind) in DELTA_FIELDS {
            let Some(value) = delta.get(*field) else {
                continue;
            };
            match value {
                Value::String(text) if text.is_empty() => {}
                Value::String(text) => events.push(match kind {
                    DeltaKind::Reasoning => StreamEvent::reasoning(text.clone()),
                    DeltaKind::Text => StreamEvent::text(text.clone()),
                }),
                // Explicit nulls are how many backends say "absent"
                Value::Null => {}
                other => self.record_drop(field, other),
            }
        }
    }

    fn record_drop(&mut self, field: &str, value: &Value) {
        self.stats.dropped_fields += 1;
        log_debug!(
            field = field,
            json_type = json_type_name(value),
            "Dropping stream field with unexpected type"
        );
    }
}

/// Map a provider usage block onto the canonical usage event.
///
/// Returns `None` if the block is not a JSON object. Cache figures are passed
/// through only when the provider reported them.
pub fn usage_event(usage: &Value) -> Option<UsageEvent> {
    let usage = usage.as_object()?;
    let count = |key: &str| usage.get(key).and_then(Value::as_u64);

    let cache_read_tokens = count("cache_read_input_tokens").or_else(|| {
        usage
            .get("prompt_tokens_details")
            .and_then(|d| d.get("cached_tokens"))
            .and_then(Value::as_u64)
    });

    Some(UsageEvent {
        input_tokens: count("prompt_tokens").unwrap_or(0),
        output_tokens: count("completion_tokens").unwrap_or(0),
        cache_write_tokens: count("cache_creation_input_tokens"),
        cache_read_tokens,
    })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Normalize an async source of raw JSON chunks into canonical events.
///
/// Single pass: all events for a chunk are yielded before the next chunk is
/// pulled. A source error or a chunk that is not a JSON object is yielded
/// as `Err` and ends the stream. Dropping the returned stream drops
/// the source.
pub fn normalize_stream<S>(chunks: S) -> EventStream
where
    S: Stream<Item = LlmResult<Value>> + Send + 'static,
{
    let state = (Box::pin(chunks), StreamNormalizer::new());

    let batches = stream::unfold(state, |(mut chunks, mut normalizer)| async move {
        if normalizer.phase() == StreamPhase::Completed {
            return None;
        }

        let batch: Vec<LlmResult<StreamEvent>> = match chunks.next().await {
            Some(Ok(raw)) if !raw.is_object() => {
                normalizer.finish();
                vec![Err(LlmError::response_parsing_error(format!(
                    "Stream chunk is not a JSON object: {raw}"
                )))]
            }
            Some(Ok(raw)) => match serde_json::from_value::<StreamChunk>(raw) {
                Ok(chunk) => normalizer
                    .process_chunk(&chunk)
                    .into_iter()
                    .map(Ok)
                    .collect(),
                Err(e) => {
                    normalizer.finish();
                    vec![Err(LlmError::response_parsing_error(format!(
                        "Malformed stream chunk: {e}"
                    )))]
                }
            },
            Some(Err(e)) => {
                normalizer.finish();
                vec![Err(e)]
            }
            None => {
                normalizer.finish();
                return None;
            }
        };

        Some((batch, (chunks, normalizer)))
    });

    Box::pin(batches.flat_map(stream::iter))
}
