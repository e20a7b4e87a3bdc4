/// Caller-facing outcomes of the link-to-notes pipeline.
///
/// Per-attempt provider errors never appear here; they are logged at the
/// retry boundary and only the aggregate outcome is surfaced.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The configured key list for a provider was empty. Fatal at startup.
    #[error("API key pool is empty")]
    EmptyKeyPool,

    /// The request carried no video link.
    #[error("Link not provided")]
    LinkNotProvided,

    #[error("Transcript generation failed after {attempts} attempts")]
    TranscriptFailed { attempts: u32 },

    #[error("Notes generation from AI failed after {attempts} attempts")]
    NotesFailed { attempts: u32 },
}
