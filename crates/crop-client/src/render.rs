//! Plain-text results view

use crop_core::{AnalysisResult, Language, TextKey, TranslationProvider};
use std::fmt::Write;

/// Render the five result fields under translated labels, then the disclaimer
#[must_use]
pub fn render_results(result: &AnalysisResult, labels: &dyn TranslationProvider, language: Language) -> String {
    let label = |key| labels.lookup(language, key);
    let mut out = String::new();

    let _ = writeln!(out, "{}", label(TextKey::ResultsTitle));
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", result.disease_name);
    let _ = writeln!(out, "{}", result.description);

    for (key, items) in [
        (TextKey::Causes, &result.causes),
        (TextKey::Organic, &result.organic_treatment),
        (TextKey::Chemical, &result.chemical_treatment),
    ] {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", label(key));
        for item in items {
            let _ = writeln!(out, "  - {item}");
        }
    }

    let _ = writeln!(out);
    let _ = write!(out, "{}", label(TextKey::Disclaimer));
    out
}
