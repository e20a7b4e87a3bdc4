pub mod groq;
pub mod normalizer;

use std::{fmt::Debug, future::Future};

use serde::{Deserialize, Serialize};

use crate::keypool::ApiKey;

/// One LLM provider capable of turning transcript text into notes.
pub trait NotesSynthesizer {
    const NOTES_MODEL: &'static str;

    type Error: Debug + Send;

    fn synthesize(
        &self,
        api_key: &ApiKey,
        transcript_text: &str,
    ) -> impl Future<Output = Result<Vec<NoteSection>, Self::Error>> + Send;
}

/// One heading-plus-content unit of the generated notes.
///
/// Content is plain text with escaped line breaks, no markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteSection {
    pub heading: String,
    pub content: String,
}
