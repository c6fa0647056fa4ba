//! Analyzer seam and the placeholder implementation
//!
//! A real inference backend plugs in behind [`Analyzer`]. Until then,
//! [`PlaceholderAnalyzer`] returns one of two canned diagnoses keyed by
//! language after a fixed delay that models inference latency.

use async_trait::async_trait;
use bytes::Bytes;
use crop_core::config::DEFAULT_ANALYSIS_DELAY_MS;
use crop_core::{AnalysisResult, Language};
use std::time::Duration;

/// One image submitted for analysis
#[derive(Debug, Clone)]
pub struct AnalysisInput {
    /// Raw image bytes, not validated
    pub image: Bytes,
    /// Declared content type of the part
    pub content_type: Option<String>,
    /// Client-side file name
    pub file_name: Option<String>,
    /// Language the diagnosis should be written in
    pub language: Language,
}

/// Analyzer failures
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    /// Backend could not produce a diagnosis
    #[error("analysis failed: {0}")]
    Failed(String),

    /// Backend exceeded its own deadline
    #[error("analysis timed out after {0:?}")]
    Timeout(Duration),
}

/// Maps an image and a language to a diagnosis
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Diagnose `input`
    async fn analyze(&self, input: &AnalysisInput) -> Result<AnalysisResult, AnalyzerError>;
}

/// Canned-response Analyzer. Never inspects pixel data.
#[derive(Debug, Clone, Copy)]
pub struct PlaceholderAnalyzer {
    delay: Duration,
}

impl PlaceholderAnalyzer {
    /// Placeholder with a custom latency
    #[inline]
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Placeholder that answers immediately
    #[inline]
    #[must_use]
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Configured latency
    #[inline]
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for PlaceholderAnalyzer {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_ANALYSIS_DELAY_MS))
    }
}

#[async_trait]
impl Analyzer for PlaceholderAnalyzer {
    async fn analyze(&self, input: &AnalysisInput) -> Result<AnalysisResult, AnalyzerError> {
        tracing::debug!(
            language = %input.language,
            bytes = input.image.len(),
            delay_ms = u64::try_from(self.delay.as_millis()).unwrap_or(u64::MAX),
            "placeholder analysis"
        );
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(canned_result(input.language))
    }
}

/// The fixed diagnosis for `language`
#[must_use]
pub fn canned_result(language: Language) -> AnalysisResult {
    fn owned(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    match language {
        Language::Hi => AnalysisResult {
            disease_name: "लीफ ब्लाइट (पत्ता झुलसा)".to_string(),
            description: "यह एक फंगल संक्रमण है जो मुख्य रूप से पत्तियों को प्रभावित करता है, जिससे वे भूरे और मुरझाए हुए हो जाते हैं।".to_string(),
            causes: owned(&["लंबे समय तक उच्च आर्द्रता", "खराब वायु संचार", "संक्रमित मिट्टी"]),
            organic_treatment: owned(&[
                "नीम के तेल का छिड़काव",
                "संक्रमित पत्तियों को हटाएं",
                "उचित धूप सुनिश्चित करें",
            ]),
            chemical_treatment: owned(&["कॉपर-आधारित फफूंदनाशक", "मैंकोजेब 2 ग्राम/लीटर का छिड़काव करें"]),
        },
        Language::En => AnalysisResult {
            disease_name: "Leaf Blight".to_string(),
            description: "A common fungal infection that primarily affects leaves, causing them to turn brown and wither.".to_string(),
            causes: owned(&[
                "Prolonged high humidity",
                "Poor air circulation",
                "Infected soil or debris",
            ]),
            organic_treatment: owned(&[
                "Apply Neem oil spray",
                "Remove infected leaves immediately",
                "Ensure proper sunlight exposure",
            ]),
            chemical_treatment: owned(&["Copper-based fungicides", "Spray Mancozeb at 2g/liter of water"]),
        },
    }
}
