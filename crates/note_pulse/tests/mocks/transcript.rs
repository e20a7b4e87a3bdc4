use std::sync::{Arc, Mutex};

use note_pulse::{ApiKey, TranscriptFetcher, TranscriptSegment};

/// Recorded as (link, key) per call.
pub type FetchCall = (String, String);

#[derive(Clone, Default)]
pub struct MockTranscriptFetcher {
    pub lines: Vec<String>,
    pub calls: Arc<Mutex<Vec<FetchCall>>>,
    pub fail_first: usize,
    pub fail_with: Option<String>,
}

impl MockTranscriptFetcher {
    pub fn new(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|line| line.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }

    /// Fails the first `fail_first` calls, then succeeds.
    pub fn flaky(fail_first: usize, lines: &[&str]) -> Self {
        Self {
            fail_first,
            ..Self::new(lines)
        }
    }
}

impl TranscriptFetcher for MockTranscriptFetcher {
    type Error = anyhow::Error;

    async fn fetch(
        &self,
        link: &str,
        api_key: &ApiKey,
    ) -> Result<Vec<TranscriptSegment>, Self::Error> {
        let call_index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((link.to_string(), api_key.as_str().to_string()));
            calls.len()
        };

        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        if call_index <= self.fail_first {
            return Err(anyhow::anyhow!("transient failure on call {}", call_index));
        }

        Ok(self
            .lines
            .iter()
            .map(|text| TranscriptSegment {
                text: text.clone(),
                start: None,
                duration: None,
            })
            .collect())
    }
}
