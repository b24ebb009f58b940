//! Supported-language set with a default-language invariant
//!
//! URLs in the default language carry no language prefix; all other
//! supported languages are prefixed. The default language is therefore
//! required to be a member of the supported set, enforced at construction.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// The set of languages a shop serves, plus the prefix-free default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawLanguages")]
pub struct SupportedLanguages {
    default: String,
    supported: Vec<String>,
}

#[derive(Deserialize)]
struct RawLanguages {
    default: String,
    supported: Vec<String>,
}

impl TryFrom<RawLanguages> for SupportedLanguages {
    type Error = Error;

    fn try_from(raw: RawLanguages) -> Result<Self> {
        Self::new(raw.default, raw.supported)
    }
}

impl SupportedLanguages {
    /// Create a language set.
    ///
    /// # Errors
    /// - `Error::InvalidLanguage` if the supported set is empty or the
    ///   default language is not a member of it
    pub fn new(default: impl Into<String>, supported: Vec<String>) -> Result<Self> {
        let default = default.into();

        if supported.is_empty() {
            return Err(Error::InvalidLanguage(
                "supported language set must not be empty".to_string(),
            ));
        }
        if !supported.iter().any(|l| l == &default) {
            return Err(Error::InvalidLanguage(format!(
                "default language '{}' is not in the supported set",
                default
            )));
        }

        // Drop duplicates while keeping declaration order
        let mut deduped: Vec<String> = Vec::with_capacity(supported.len());
        for lang in supported {
            if !deduped.contains(&lang) {
                deduped.push(lang);
            }
        }

        Ok(Self {
            default,
            supported: deduped,
        })
    }

    /// Single-language set where the only language is the default.
    pub fn single(lang: impl Into<String>) -> Self {
        let lang = lang.into();
        Self {
            default: lang.clone(),
            supported: vec![lang],
        }
    }

    pub fn default_language(&self) -> &str {
        &self.default
    }

    pub fn supported(&self) -> &[String] {
        &self.supported
    }

    /// Total over arbitrary input; unsupported or garbage strings return false.
    pub fn is_supported(&self, lang: &str) -> bool {
        self.supported.iter().any(|l| l == lang)
    }

    /// Replace an out-of-set language with the default.
    ///
    /// Used after matching to protect against a compiled alternation that
    /// still accepts a since-removed language code.
    pub fn sanitize<'a>(&'a self, lang: &'a str) -> &'a str {
        if self.is_supported(lang) {
            lang
        } else {
            &self.default
        }
    }

    /// Supported languages other than the default, in declaration order.
    pub fn non_default(&self) -> impl Iterator<Item = &str> {
        self.supported
            .iter()
            .filter(move |l| *l != &self.default)
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cs_en() -> SupportedLanguages {
        SupportedLanguages::new("cs", vec!["cs".to_string(), "en".to_string()]).unwrap()
    }

    #[test]
    fn test_default_must_be_supported() {
        let result = SupportedLanguages::new("de", vec!["cs".to_string(), "en".to_string()]);
        assert!(matches!(result, Err(Error::InvalidLanguage(_))));
    }

    #[test]
    fn test_empty_set_rejected() {
        assert!(SupportedLanguages::new("cs", vec![]).is_err());
    }

    #[test]
    fn test_is_supported_total() {
        let langs = cs_en();
        assert!(langs.is_supported("cs"));
        assert!(langs.is_supported("en"));
        assert!(!langs.is_supported("de"));
        assert!(!langs.is_supported(""));
        assert!(!langs.is_supported("../../etc"));
    }

    #[test]
    fn test_sanitize_falls_back_to_default() {
        let langs = cs_en();
        assert_eq!(langs.sanitize("en"), "en");
        assert_eq!(langs.sanitize("de"), "cs");
    }

    #[test]
    fn test_non_default_order() {
        let langs = SupportedLanguages::new(
            "cs",
            vec!["en".to_string(), "cs".to_string(), "de".to_string()],
        )
        .unwrap();
        let non_default: Vec<&str> = langs.non_default().collect();
        assert_eq!(non_default, vec!["en", "de"]);
    }

    #[test]
    fn test_duplicates_removed() {
        let langs = SupportedLanguages::new(
            "cs",
            vec!["cs".to_string(), "en".to_string(), "cs".to_string()],
        )
        .unwrap();
        assert_eq!(langs.supported(), &["cs".to_string(), "en".to_string()]);
    }

    #[test]
    fn test_deserialize_enforces_invariant() {
        let ok: SupportedLanguages =
            serde_json::from_str(r#"{"default":"cs","supported":["cs","en"]}"#).unwrap();
        assert_eq!(ok.default_language(), "cs");

        let bad: std::result::Result<SupportedLanguages, _> =
            serde_json::from_str(r#"{"default":"de","supported":["cs","en"]}"#);
        assert!(bad.is_err());
    }
}
