mod error;
pub mod http;
mod keypool;
pub mod llm;
mod pipeline;
pub mod retry;
pub mod tracing;
pub mod yt;

pub use error::Error;
pub use keypool::{ApiKey, ApiKeyPool};
pub use llm::{
    groq::GroqClient,
    normalizer::{normalize_notes, FormatError},
    NoteSection, NotesSynthesizer,
};
pub use pipeline::{NotesPipeline, NotesPipelineBuilder};
pub use yt::{transcript::TranscriptApi, TranscriptFetcher, TranscriptSegment};
