use schemars::{JsonSchema, schema_for};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ResearchResponse {
    pub topic: String,
    pub summary: String,
    pub sources: Vec<String>,
    pub tools_used: Vec<String>,
}

pub fn format_instructions() -> agent::Result<String> {
    let schema = schema_for!(ResearchResponse);
    Ok(format!(
        "Answer with a single JSON object that conforms to the JSON schema below. \
         Output the JSON object only, with no other text.\n{}",
        serde_json::to_string_pretty(&schema)?
    ))
}

#[derive(Error, Debug)]
#[error("could not parse research response: {source}")]
pub struct ParseError {
    pub raw: String,
    #[source]
    pub source: serde_json::Error,
}

pub fn parse_response(raw: &str) -> Result<ResearchResponse, ParseError> {
    serde_json::from_str(extract_json(raw)).map_err(|source| ParseError {
        raw: raw.to_string(),
        source,
    })
}

// models tend to wrap the object in code fences or stray prose
fn extract_json(raw: &str) -> &str {
    match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if start < end => &raw[start..=end],
        _ => raw,
    }
}
