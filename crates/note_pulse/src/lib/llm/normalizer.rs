//! Normalizes raw LLM output into validated note sections.
//!
//! Models occasionally wrap the requested JSON array in prose or code
//! fences. The fallback recovers the common case of an array embedded in
//! surrounding text; it does not attempt full prose-to-structure repair.

use crate::llm::NoteSection;

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// Neither strict parsing nor bracket extraction produced notes.
    /// Carries the raw text for diagnostic logging only; it must never
    /// reach the end caller verbatim.
    #[error("response contains no parsable notes array")]
    Unparsable { raw: String },

    #[error("response parsed to an empty notes array")]
    Empty,
}

/// Strict-then-fallback parsing of a completion into note sections.
///
/// Stage one parses the whole text as a JSON array of
/// `{heading, content}` objects. Stage two takes the substring from the
/// first `[` to the last `]` and parses that.
pub fn normalize_notes(raw: &str) -> Result<Vec<NoteSection>, FormatError> {
    let notes = match serde_json::from_str::<Vec<NoteSection>>(raw) {
        Ok(notes) => notes,
        Err(_) => extract_embedded_array(raw).ok_or_else(|| FormatError::Unparsable {
            raw: raw.to_string(),
        })?,
    };

    if notes.is_empty() {
        return Err(FormatError::Empty);
    }

    Ok(notes)
}

fn extract_embedded_array(raw: &str) -> Option<Vec<NoteSection>> {
    let start = raw.find('[')?;
    let end = raw.rfind(']')?;
    if start >= end {
        return None;
    }
    serde_json::from_str(&raw[start..=end]).ok()
}
