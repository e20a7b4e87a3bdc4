use std::sync::{Arc, Mutex};

use note_pulse::{ApiKey, NoteSection, NotesSynthesizer};

/// Recorded as (key, transcript text) per call.
pub type SynthesizeCall = (String, String);

#[derive(Clone, Default)]
pub struct MockNotesSynthesizer {
    pub notes: Vec<NoteSection>,
    pub calls: Arc<Mutex<Vec<SynthesizeCall>>>,
    pub fail_with: Option<String>,
}

impl MockNotesSynthesizer {
    pub fn new(notes: Vec<NoteSection>) -> Self {
        Self {
            notes,
            ..Default::default()
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }
}

impl NotesSynthesizer for MockNotesSynthesizer {
    const NOTES_MODEL: &'static str = "mock-llama";
    type Error = anyhow::Error;

    async fn synthesize(
        &self,
        api_key: &ApiKey,
        transcript_text: &str,
    ) -> Result<Vec<NoteSection>, Self::Error> {
        self.calls
            .lock()
            .unwrap()
            .push((api_key.as_str().to_string(), transcript_text.to_string()));

        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }

        Ok(self.notes.clone())
    }
}
