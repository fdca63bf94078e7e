use serde_json::Value;

use contexta_core::StructuredDomainModel;

use crate::GenerateError;

/// Walk `candidates[0].content.parts[0].text`.
pub fn extract_text(envelope: &Value) -> Result<&str, GenerateError> {
    envelope
        .get("candidates")
        .and_then(Value::as_array)
        .and_then(|candidates| candidates.first())
        .and_then(|candidate| candidate.get("content"))
        .and_then(|content| content.get("parts"))
        .and_then(Value::as_array)
        .and_then(|parts| parts.first())
        .and_then(|part| part.get("text"))
        .and_then(Value::as_str)
        .ok_or_else(|| {
            tracing::error!(envelope = %envelope, "unexpected response structure");
            GenerateError::UnexpectedStructure
        })
}

/// Parse the model's text payload. Field-level problems are absorbed by the
/// lenient decoders; only non-JSON or non-object payloads fail.
pub fn parse_payload(text: &str) -> Result<StructuredDomainModel, GenerateError> {
    let value = parse_object(text).map_err(|e| {
        tracing::error!(raw = %text, "could not parse model JSON: {e}");
        GenerateError::InvalidPayload(e)
    })?;
    serde_json::from_value(value).map_err(|e| {
        tracing::error!(raw = %text, "model JSON does not decode: {e}");
        GenerateError::InvalidPayload(e.to_string())
    })
}

/// Envelope in, model out.
pub fn validate(envelope: &Value) -> Result<StructuredDomainModel, GenerateError> {
    parse_payload(extract_text(envelope)?)
}

fn parse_object(text: &str) -> Result<Value, String> {
    let value: Value = serde_json::from_str(text).map_err(|e| e.to_string())?;
    if value.is_object() {
        Ok(value)
    } else {
        Err("expected a JSON object".to_string())
    }
}
