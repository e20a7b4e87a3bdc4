pub mod transcript;

use std::{fmt::Debug, future::Future};

use serde::Deserialize;

use crate::keypool::ApiKey;

/// One external transcript provider.
///
/// The key is passed per call because keys rotate out of a pool rather
/// than being owned by the client.
pub trait TranscriptFetcher {
    type Error: Debug + Send;

    fn fetch(
        &self,
        link: &str,
        api_key: &ApiKey,
    ) -> impl Future<Output = Result<Vec<TranscriptSegment>, Self::Error>> + Send;
}

/// A single timed caption line as returned by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptSegment {
    pub text: String,
    pub start: Option<f64>,
    pub duration: Option<f64>,
}
