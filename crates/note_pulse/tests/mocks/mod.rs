pub mod synthesizer;
pub mod transcript;
