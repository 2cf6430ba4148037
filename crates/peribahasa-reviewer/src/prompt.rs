//! Correction prompt

use peribahasa_domain::ProverbEntry;
use serde_json::{json, Value};

const INSTRUCTIONS: &str = r#"You are proofreading a collection of Malay proverbs (peribahasa) and their meanings (artinya).

For every entry, correct spelling, spacing, punctuation and capitalisation mistakes only.

Rules:
- Preserve archaic and traditional spellings and regional variants. Do not modernize the language.
- Do not paraphrase, shorten or extend an entry.
- If an entry is already correct, return it unchanged with "cek": 1.0.
- "cek" is your confidence between 0.0 and 1.0 that the returned text is correct. Use a value below 0.5 when a person should check the entry.
- Return one correction per entry, using the same id.

Reply with JSON only, without commentary, in exactly this shape:
{"corrections": [{"id": 1, "cek_peribahasa": "...", "cek_artinya": "...", "cek": 1.0}]}"#;

/// Build the prompt for one batch
pub fn build_prompt(batch: &[ProverbEntry]) -> String {
    let entries: Vec<Value> = batch
        .iter()
        .map(|e| json!({"id": e.id.value(), "peribahasa": e.text, "artinya": e.meaning}))
        .collect();
    format!("{}\n\nEntries to check:\n{:#}", INSTRUCTIONS, Value::Array(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use peribahasa_domain::{EntryId, ReviewStatus};

    fn entry(id: i64, text: &str, meaning: &str) -> ProverbEntry {
        ProverbEntry {
            id: EntryId::from_value(id),
            text: text.to_string(),
            meaning: meaning.to_string(),
            used: false,
            source: None,
            reviewed_text: None,
            reviewed_meaning: None,
            review: ReviewStatus::Unreviewed,
        }
    }

    #[test]
    fn test_prompt_lists_batch_as_json() {
        let prompt = build_prompt(&[entry(7, "Air \"dicincang\"", "Tidak putus")]);

        let (head, tail) = prompt.split_once("Entries to check:\n").unwrap();
        assert!(head.contains("Do not modernize"));
        let listed: Value = serde_json::from_str(tail).unwrap();
        assert_eq!(
            listed,
            json!([{"id": 7, "peribahasa": "Air \"dicincang\"", "artinya": "Tidak putus"}])
        );
    }
}
