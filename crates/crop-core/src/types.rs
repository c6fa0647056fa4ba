//! Domain types shared by the endpoint, the client and the store
//!
//! - `Language`: the two supported display/analysis languages
//! - `AnalysisResult`: the diagnosis returned by the Analyzer
//! - `NewAnalysisRecord` / `AnalysisRecord`: the flattened history row

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Delimiter used when list fields are flattened into record text.
pub const LIST_DELIMITER: &str = ", ";

/// Supported languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English, the primary language and fallback for unknown codes
    #[default]
    En,
    /// Hindi
    Hi,
}

impl Language {
    /// All supported languages, primary first
    pub const ALL: [Language; 2] = [Language::En, Language::Hi];

    /// Resolve a language code, falling back to English.
    ///
    /// Unknown, empty or differently-cased codes are not rejected: they map
    /// to the primary language.
    #[inline]
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        Self::parse(code).unwrap_or_default()
    }

    /// Strict parse of a language code
    #[inline]
    #[must_use]
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "en" => Some(Language::En),
            "hi" => Some(Language::Hi),
            _ => None,
        }
    }

    /// Wire code (`"en"` or `"hi"`)
    #[inline]
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
        }
    }

    /// Name of the language written in that language
    #[inline]
    #[must_use]
    pub fn native_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Hi => "हिंदी",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Diagnosis for one crop image.
///
/// All five fields are required on the wire. A body missing a field or
/// carrying a wrong element type fails to deserialize; nothing is defaulted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Disease name
    pub disease_name: String,
    /// Short description of the disease
    pub description: String,
    /// Likely causes, most relevant first
    pub causes: Vec<String>,
    /// Organic treatment steps
    pub organic_treatment: Vec<String>,
    /// Chemical treatment steps
    pub chemical_treatment: Vec<String>,
}

/// Analysis record before the store assigns identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAnalysisRecord {
    /// Reference to the analyzed image (uploaded file name), if known
    pub image_ref: Option<String>,
    /// Disease name
    pub disease_name: String,
    /// Description
    pub description: String,
    /// Causes joined with [`LIST_DELIMITER`]
    pub causes: String,
    /// Organic treatments joined with [`LIST_DELIMITER`]
    pub organic_treatment: String,
    /// Chemical treatments joined with [`LIST_DELIMITER`]
    pub chemical_treatment: String,
    /// Language the result was produced in
    pub language: Language,
}

impl NewAnalysisRecord {
    /// Flatten a result into a record
    #[must_use]
    pub fn from_result(
        result: &AnalysisResult,
        language: Language,
        image_ref: Option<String>,
    ) -> Self {
        Self {
            image_ref,
            disease_name: result.disease_name.clone(),
            description: result.description.clone(),
            causes: result.causes.join(LIST_DELIMITER),
            organic_treatment: result.organic_treatment.join(LIST_DELIMITER),
            chemical_treatment: result.chemical_treatment.join(LIST_DELIMITER),
            language,
        }
    }

    /// Attach store-assigned identity
    #[inline]
    #[must_use]
    pub fn into_record(self, id: u64, created_at: DateTime<Utc>) -> AnalysisRecord {
        AnalysisRecord {
            id,
            created_at,
            record: self,
        }
    }
}

/// Persisted analysis record. Write-only from the analysis flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    /// Store-assigned identifier, monotonic from 1
    pub id: u64,
    /// Store-assigned creation time
    pub created_at: DateTime<Utc>,
    /// Flattened fields
    #[serde(flatten)]
    pub record: NewAnalysisRecord,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn sample() -> AnalysisResult {
        AnalysisResult {
            disease_name: "Leaf Blight".to_string(),
            description: "Fungal".to_string(),
            causes: vec!["Humidity".to_string(), "Soil".to_string()],
            organic_treatment: vec!["Neem oil".to_string()],
            chemical_treatment: vec![],
        }
    }

    #[test]
    fn language_codes() {
        assert_eq!(Language::from_code("en"), Language::En);
        assert_eq!(Language::from_code("hi"), Language::Hi);
        assert_eq!(Language::from_code(""), Language::En);
        assert_eq!(Language::from_code("HI"), Language::En);
        assert_eq!(Language::parse("fr"), None);
        assert_eq!(Language::Hi.to_string(), "hi");
    }

    #[test]
    fn result_uses_camel_case_on_the_wire() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["diseaseName"], "Leaf Blight");
        assert_eq!(json["organicTreatment"][0], "Neem oil");
        assert!(json["chemicalTreatment"].as_array().unwrap().is_empty());
    }

    #[test]
    fn result_rejects_missing_field() {
        let body = r#"{"diseaseName":"x","description":"y","causes":[],"organicTreatment":[]}"#;
        assert!(serde_json::from_str::<AnalysisResult>(body).is_err());
    }

    #[test]
    fn result_rejects_wrong_element_type() {
        let body = r#"{"diseaseName":"x","description":"y","causes":[1],"organicTreatment":[],"chemicalTreatment":[]}"#;
        assert!(serde_json::from_str::<AnalysisResult>(body).is_err());
    }

    #[test]
    fn result_ignores_unknown_fields() {
        let body = r#"{"diseaseName":"x","description":"y","causes":[],"organicTreatment":[],"chemicalTreatment":[],"confidence":0.9}"#;
        let parsed: AnalysisResult = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.disease_name, "x");
    }

    #[test]
    fn record_flattens_lists() {
        let record = NewAnalysisRecord::from_result(&sample(), Language::Hi, Some("leaf.jpg".into()));
        assert_eq!(record.causes, "Humidity, Soil");
        assert_eq!(record.chemical_treatment, "");
        assert_eq!(record.language, Language::Hi);

        let stored = record.clone().into_record(7, Utc::now());
        let json = serde_json::to_value(&stored).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["disease_name"], "Leaf Blight");
        assert_eq!(json["language"], "hi");
    }

    proptest! {
        #[test]
        fn prop_unknown_codes_fall_back_to_english(code in "[a-zA-Z]{0,5}") {
            let lang = Language::from_code(&code);
            if code == "hi" {
                prop_assert_eq!(lang, Language::Hi);
            } else {
                prop_assert_eq!(lang, Language::En);
            }
        }
    }
}
