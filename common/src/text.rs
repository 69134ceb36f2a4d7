//! Bilingual text definitions.

use crate::define_kind;

/// Piece of text carried in both marketplace locales.
///
/// Documents store both translations side by side; pages pick the one
/// matching their locale prefix.
#[derive(
    Clone, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize,
)]
#[serde(default)]
#[cfg_attr(feature = "juniper", derive(juniper::GraphQLObject))]
pub struct Bilingual {
    /// English translation.
    pub en: String,

    /// Arabic translation.
    pub ar: String,
}

impl Bilingual {
    /// Creates a new [`Bilingual`] text from both translations.
    #[must_use]
    pub fn new(en: impl Into<String>, ar: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            ar: ar.into(),
        }
    }

    /// Returns the translation for the provided [`Locale`], falling back to
    /// the other one when it's empty.
    #[must_use]
    pub fn localize(&self, locale: Locale) -> &str {
        let (wanted, fallback) = match locale {
            Locale::En => (&self.en, &self.ar),
            Locale::Ar => (&self.ar, &self.en),
        };
        if wanted.is_empty() {
            fallback
        } else {
            wanted
        }
    }
}

define_kind! {
    #[doc = "Locale of the marketplace."]
    enum Locale {
        #[doc = "English."]
        En = 1,

        #[doc = "Arabic."]
        Ar = 2,
    }
}

#[cfg(test)]
mod spec {
    use super::{Bilingual, Locale};

    #[test]
    fn localizes_with_fallback() {
        let text = Bilingual::new("stable", "اسطبل");
        assert_eq!(text.localize(Locale::En), "stable");
        assert_eq!(text.localize(Locale::Ar), "اسطبل");

        let partial = Bilingual::new("stable", "");
        assert_eq!(partial.localize(Locale::Ar), "stable");
    }
}
