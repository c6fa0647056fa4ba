//! Translation provider
//!
//! Label lookup keyed by (language, key). The table is immutable and built
//! at compile time; components receive a provider instead of reaching for a
//! global.

use crate::types::Language;

/// Every label the client views display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextKey {
    /// Application title
    Title,
    /// Tagline under the title
    Subtitle,
    /// Heading of the upload zone
    UploadTitle,
    /// Upload zone hint
    UploadDesc,
    /// Submit button
    AnalyzeBtn,
    /// Submit button while a request is pending
    Analyzing,
    /// Results heading
    ResultsTitle,
    /// Causes section
    Causes,
    /// Organic treatment section
    Organic,
    /// Chemical treatment section
    Chemical,
    /// Reset button on the results view
    TryAgain,
    /// Title of the failure notice
    Error,
    /// Title of the no-image notice
    NoFile,
    /// File picker label
    SelectFile,
    /// Preview badge
    Preview,
    /// Disclaimer under the results
    Disclaimer,
    /// Inline notice for a rejected non-image file
    NotAnImage,
}

impl TextKey {
    /// All keys, in display order
    pub const ALL: [TextKey; 17] = [
        TextKey::Title,
        TextKey::Subtitle,
        TextKey::UploadTitle,
        TextKey::UploadDesc,
        TextKey::AnalyzeBtn,
        TextKey::Analyzing,
        TextKey::ResultsTitle,
        TextKey::Causes,
        TextKey::Organic,
        TextKey::Chemical,
        TextKey::TryAgain,
        TextKey::Error,
        TextKey::NoFile,
        TextKey::SelectFile,
        TextKey::Preview,
        TextKey::Disclaimer,
        TextKey::NotAnImage,
    ];
}

/// Key to string lookup per language
pub trait TranslationProvider: Send + Sync {
    /// Label for `key` in `language`
    fn lookup(&self, language: Language, key: TextKey) -> &str;

    /// Label for `key` in the language named by `code`.
    ///
    /// Total: unknown codes use the default language.
    fn lookup_code(&self, code: &str, key: TextKey) -> &str {
        self.lookup(Language::from_code(code), key)
    }
}

/// Built-in English and Hindi tables
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticTranslations;

impl StaticTranslations {
    /// Create the provider
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl TranslationProvider for StaticTranslations {
    fn lookup(&self, language: Language, key: TextKey) -> &str {
        match language {
            Language::En => english(key),
            Language::Hi => hindi(key),
        }
    }
}

const fn english(key: TextKey) -> &'static str {
    match key {
        TextKey::Title => "Crop Doctor AI",
        TextKey::Subtitle => "Instant disease detection for healthier crops",
        TextKey::UploadTitle => "Upload Crop Image",
        TextKey::UploadDesc => "Drag & drop or click to select a photo of the affected plant",
        TextKey::AnalyzeBtn => "Analyze Crop",
        TextKey::Analyzing => "Analyzing...",
        TextKey::ResultsTitle => "Diagnosis Results",
        TextKey::Causes => "Possible Causes",
        TextKey::Organic => "Organic Solutions",
        TextKey::Chemical => "Chemical Treatments",
        TextKey::TryAgain => "Analyze Another Image",
        TextKey::Error => "Something went wrong. Please try again.",
        TextKey::NoFile => "No file selected",
        TextKey::SelectFile => "Select a file",
        TextKey::Preview => "Image Preview",
        TextKey::Disclaimer => {
            "AI diagnosis is for reference only. Consult an expert for confirmation."
        }
        TextKey::NotAnImage => "Please select an image file",
    }
}

const fn hindi(key: TextKey) -> &'static str {
    match key {
        TextKey::Title => "फसल डॉक्टर एआई",
        TextKey::Subtitle => "स्वस्थ फसलों के लिए तत्काल रोग पहचान",
        TextKey::UploadTitle => "फसल की छवि अपलोड करें",
        TextKey::UploadDesc => "प्रभावित पौधे की फोटो चुनें या खींचें और छोड़ें",
        TextKey::AnalyzeBtn => "विश्लेषण करें",
        TextKey::Analyzing => "विश्लेषण हो रहा है...",
        TextKey::ResultsTitle => "निदान परिणाम",
        TextKey::Causes => "संभावित कारण",
        TextKey::Organic => "जैविक उपचार",
        TextKey::Chemical => "रासायनिक उपचार",
        TextKey::TryAgain => "दूसरी छवि का विश्लेषण करें",
        TextKey::Error => "कुछ गलत हो गया। कृपया पुन: प्रयास करें।",
        TextKey::NoFile => "कोई फाइल नहीं चुनी गई",
        TextKey::SelectFile => "फाइल चुनें",
        TextKey::Preview => "छवि पूर्वावलोकन",
        TextKey::Disclaimer => "एआई निदान केवल संदर्भ के लिए है। पुष्टि के लिए विशेषज्ञ से सलाह लें।",
        TextKey::NotAnImage => "कृपया एक छवि फाइल चुनें",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_key_is_translated() {
        let t = StaticTranslations::new();
        for lang in Language::ALL {
            for key in TextKey::ALL {
                assert!(!t.lookup(lang, key).is_empty(), "{lang} {key:?}");
            }
        }
    }

    #[test]
    fn hindi_differs_from_english() {
        let t = StaticTranslations::new();
        for key in TextKey::ALL {
            assert_ne!(t.lookup(Language::En, key), t.lookup(Language::Hi, key));
        }
    }

    #[test]
    fn unknown_code_falls_back_to_english() {
        let t = StaticTranslations::new();
        assert_eq!(t.lookup_code("de", TextKey::Title), "Crop Doctor AI");
        assert_eq!(t.lookup_code("hi", TextKey::Causes), "संभावित कारण");
    }
}
