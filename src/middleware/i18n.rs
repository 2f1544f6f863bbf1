// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

/// Idiomas com mensagens traduzidas. O primeiro é o padrão.
const SUPPORTED_LANGUAGES: [&str; 2] = ["pt", "en"];

// Extrator de idioma (Accept-Language)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale(pub String);

impl Default for Locale {
    fn default() -> Self {
        Locale(SUPPORTED_LANGUAGES[0].to_string())
    }
}

impl Locale {
    /// Escolhe o primeiro idioma suportado do cabeçalho; cai no português.
    pub fn from_header(header_str: &str) -> Self {
        accept_language::intersection(header_str, &SUPPORTED_LANGUAGES)
            .into_iter()
            .next()
            .or_else(|| {
                // "pt-BR" -> split vira ["pt", "BR"] -> next() pega "pt"
                accept_language::parse(header_str).into_iter().find_map(|tag| {
                    let primary = tag.split('-').next().unwrap_or(&tag).to_ascii_lowercase();
                    SUPPORTED_LANGUAGES
                        .contains(&primary.as_str())
                        .then_some(primary)
                })
            })
            .map(Locale)
            .unwrap_or_default()
    }
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let locale = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|header_value| header_value.to_str().ok())
            .map(Locale::from_header)
            .unwrap_or_default();

        Ok(locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_portuguese() {
        assert_eq!(Locale::default().0, "pt");
        assert_eq!(Locale::from_header("").0, "pt");
        assert_eq!(Locale::from_header("de-DE,fr;q=0.8").0, "pt");
    }

    #[test]
    fn picks_regional_variants() {
        assert_eq!(Locale::from_header("pt-BR,pt;q=0.9").0, "pt");
        assert_eq!(Locale::from_header("en-US,en;q=0.9").0, "en");
    }

    #[test]
    fn respects_preference_order() {
        assert_eq!(Locale::from_header("fr-FR, en;q=0.8, pt;q=0.5").0, "en");
    }
}
