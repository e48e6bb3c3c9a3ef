//! DTOs for the generation capability wire format.
//!
//! Requests are a prompt plus a tool-use flag. Responses are decoded into
//! these DTOs first and then mapped into the domain `CapabilityResponse`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::ports::{CapabilityMetadata, CapabilityResponse};

#[derive(Debug, Serialize)]
pub(super) struct ExecuteRequestDto<'a> {
    pub(super) prompt: &'a str,
    pub(super) use_tools: bool,
}

#[derive(Debug, Deserialize)]
pub(super) struct ExecuteResponseDto {
    pub(super) success: bool,
    #[serde(default)]
    pub(super) content: Option<String>,
    #[serde(default)]
    pub(super) error: Option<String>,
    #[serde(default)]
    pub(super) metadata: Option<Map<String, Value>>,
}

impl ExecuteResponseDto {
    pub(super) fn into_domain(self) -> CapabilityResponse {
        let mut extra = self.metadata.unwrap_or_default();
        let tools_used = extra
            .remove("tools_used")
            .is_some_and(|value| is_truthy(&value));
        CapabilityResponse {
            success: self.success,
            content: self.content.unwrap_or_default(),
            error: self.error,
            metadata: CapabilityMetadata { tools_used, extra },
        }
    }
}

// Capabilities report tool use as a flag, a count, or a list of tool names.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::Number(count) => count.as_u64().is_some_and(|n| n > 0),
        Value::Array(items) => !items.is_empty(),
        Value::String(text) => !text.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Null => false,
    }
}
