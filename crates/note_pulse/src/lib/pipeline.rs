use crate::{
    error::Error,
    keypool::ApiKeyPool,
    llm::{NoteSection, NotesSynthesizer},
    retry::{self, RetryPolicy},
    yt::TranscriptFetcher,
};

/// The core link-to-notes orchestrator.
///
/// Each call to [`handle`](NotesPipeline::handle) is independent and
/// stateless; the only shared mutable state is the per-provider key
/// pools' usage counters.
pub struct NotesPipeline<T, S>
where
    T: TranscriptFetcher + Send + Sync + 'static,
    S: NotesSynthesizer + Send + Sync + 'static,
{
    transcript_pool: ApiKeyPool,
    llm_pool: ApiKeyPool,
    fetcher: T,
    synthesizer: S,
    transcript_retry: RetryPolicy,
    notes_retry: RetryPolicy,
}

impl<T, S> NotesPipeline<T, S>
where
    T: TranscriptFetcher + Send + Sync + 'static,
    S: NotesSynthesizer + Send + Sync + 'static,
{
    /// Turns a video link into structured notes.
    ///
    /// Retrieves the transcript under the transcript retry budget, then
    /// synthesizes notes under the LLM retry budget. The second stage
    /// never runs when the first fails.
    #[tracing::instrument(skip(self))]
    pub async fn handle(&self, link: &str) -> Result<Vec<NoteSection>, Error> {
        // presence is the only link validation performed here
        if link.trim().is_empty() {
            return Err(Error::LinkNotProvided);
        }

        let segments = retry::invoke(&self.transcript_pool, &self.transcript_retry, |key| {
            async move { self.fetcher.fetch(link, &key).await }
        })
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Transcript retrieval exhausted its attempts");
            Error::TranscriptFailed {
                attempts: e.attempts,
            }
        })?;

        tracing::info!(segments = segments.len(), "Transcript retrieved");

        let transcript_text = segments
            .iter()
            .map(|segment| segment.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let transcript_text = transcript_text.as_str();

        let notes = retry::invoke(&self.llm_pool, &self.notes_retry, |key| async move {
            self.synthesizer.synthesize(&key, transcript_text).await
        })
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Notes synthesis exhausted its attempts");
            Error::NotesFailed {
                attempts: e.attempts,
            }
        })?;

        tracing::info!(sections = notes.len(), "Notes generated");
        Ok(notes)
    }
}

/// Typestate builder for [`NotesPipeline`]; the fetcher and synthesizer
/// slots start as `()` so tests can plug in deterministic doubles.
pub struct NotesPipelineBuilder<T = (), S = ()> {
    transcript_pool: ApiKeyPool,
    llm_pool: ApiKeyPool,
    fetcher: T,
    synthesizer: S,
    transcript_retry: RetryPolicy,
    notes_retry: RetryPolicy,
}

impl NotesPipelineBuilder {
    pub fn new(transcript_pool: ApiKeyPool, llm_pool: ApiKeyPool) -> Self {
        Self {
            transcript_pool,
            llm_pool,
            fetcher: (),
            synthesizer: (),
            transcript_retry: RetryPolicy::transcript(),
            notes_retry: RetryPolicy::notes(),
        }
    }
}

impl<T, S> NotesPipelineBuilder<T, S> {
    pub fn fetcher<T2: TranscriptFetcher + Send + Sync + 'static>(
        self,
        fetcher: T2,
    ) -> NotesPipelineBuilder<T2, S> {
        NotesPipelineBuilder {
            transcript_pool: self.transcript_pool,
            llm_pool: self.llm_pool,
            fetcher,
            synthesizer: self.synthesizer,
            transcript_retry: self.transcript_retry,
            notes_retry: self.notes_retry,
        }
    }

    pub fn synthesizer<S2: NotesSynthesizer + Send + Sync + 'static>(
        self,
        synthesizer: S2,
    ) -> NotesPipelineBuilder<T, S2> {
        NotesPipelineBuilder {
            transcript_pool: self.transcript_pool,
            llm_pool: self.llm_pool,
            fetcher: self.fetcher,
            synthesizer,
            transcript_retry: self.transcript_retry,
            notes_retry: self.notes_retry,
        }
    }

    pub fn transcript_retry(mut self, policy: RetryPolicy) -> Self {
        self.transcript_retry = policy;
        self
    }

    pub fn notes_retry(mut self, policy: RetryPolicy) -> Self {
        self.notes_retry = policy;
        self
    }
}

impl<T, S> NotesPipelineBuilder<T, S>
where
    T: TranscriptFetcher + Send + Sync + 'static,
    S: NotesSynthesizer + Send + Sync + 'static,
{
    pub fn build(self) -> NotesPipeline<T, S> {
        NotesPipeline {
            transcript_pool: self.transcript_pool,
            llm_pool: self.llm_pool,
            fetcher: self.fetcher,
            synthesizer: self.synthesizer,
            transcript_retry: self.transcript_retry,
            notes_retry: self.notes_retry,
        }
    }
}
