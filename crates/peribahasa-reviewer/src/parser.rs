//! Parse LLM replies into corrections

use crate::error::ReviewError;
use peribahasa_domain::{Confidence, EntryId};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

/// One corrected entry returned by the LLM
#[derive(Debug, Clone, PartialEq)]
pub struct Correction {
    /// Entry the correction applies to
    pub id: EntryId,
    /// Corrected proverb text
    pub text: String,
    /// Corrected meaning
    pub meaning: String,
    /// LLM confidence, clamped into [0, 1]
    pub confidence: Confidence,
}

#[derive(Debug, Deserialize)]
struct RawCorrection {
    id: i64,
    cek_peribahasa: String,
    cek_artinya: String,
    cek: f64,
}

/// Parse a corrections reply
///
/// The reply must be a JSON object (optionally inside a markdown code fence)
/// with a `corrections` array. Items missing a field are dropped with a
/// warning; the entries they refer to stay unreviewed.
///
/// # Examples
///
/// ```
/// use peribahasa_reviewer::parse_corrections;
///
/// let reply = "```json\n{\"corrections\": [{\"id\": 1, \"cek_peribahasa\": \"Ada gula ada semut\", \"cek_artinya\": \"Rezeki\", \"cek\": 0.9}]}\n```";
/// let corrections = parse_corrections(reply).unwrap();
/// assert_eq!(corrections[0].id.value(), 1);
///
/// assert!(parse_corrections("Sorry, I cannot help.").is_err());
/// ```
pub fn parse_corrections(response: &str) -> Result<Vec<Correction>, ReviewError> {
    let json: Value = serde_json::from_str(strip_code_fence(response))
        .map_err(|e| ReviewError::MalformedResponse(format!("JSON parse error: {}", e)))?;

    let items = json
        .get("corrections")
        .and_then(|c| c.as_array())
        .ok_or_else(|| ReviewError::MalformedResponse("missing 'corrections' array".to_string()))?;

    let mut corrections = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        let raw: RawCorrection = match serde_json::from_value(item.clone()) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Skipping correction {}: {}", idx, e);
                continue;
            }
        };
        if !(0.0..=1.0).contains(&raw.cek) {
            warn!(id = raw.id, cek = raw.cek, "confidence out of range, clamping");
        }
        corrections.push(Correction {
            id: EntryId::from_value(raw.id),
            text: raw.cek_peribahasa,
            meaning: raw.cek_artinya,
            confidence: Confidence::clamped(raw.cek),
        });
    }
    Ok(corrections)
}

/// Remove a surrounding ```` ``` ```` or ```` ```json ```` fence
fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // drop the info string ("json") on the opening line
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}
