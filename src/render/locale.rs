use crate::i18n::DEFAULT_LOCALE;
use axum::http::{header::COOKIE, request::Parts};

pub const LOCALE_HEADER: &str = "locale";
pub const LOCALE_QUERY: &str = "locale";
pub const LOCALE_COOKIE: &str = "locale";

/// Resolve the locale of a request.
///
/// Order: `Locale` header, `locale` query parameter, `locale` cookie, then
/// [`DEFAULT_LOCALE`].
#[must_use]
pub fn locale_from_request(parts: &Parts) -> String {
    if let Some(locale) = parts
        .headers
        .get(LOCALE_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
    {
        return locale.to_string();
    }

    if let Some(query) = parts.uri.query() {
        if let Some((_, locale)) = url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, value)| key == LOCALE_QUERY && !value.is_empty())
        {
            return locale.into_owned();
        }
    }

    parts
        .headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == LOCALE_COOKIE && !value.is_empty())
        .map_or_else(|| DEFAULT_LOCALE.to_string(), |(_, value)| value.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(builder: axum::http::request::Builder) -> Parts {
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn defaults_to_en_us() {
        let parts = parts(Request::builder().uri("/auth/login"));
        assert_eq!(locale_from_request(&parts), "en-US");
    }

    #[test]
    fn header_wins_over_query_and_cookie() {
        let parts = parts(
            Request::builder()
                .uri("/auth/login?locale=fr-FR")
                .header("Locale", "de-DE")
                .header("Cookie", "locale=ja-JP"),
        );
        assert_eq!(locale_from_request(&parts), "de-DE");
    }

    #[test]
    fn query_wins_over_cookie() {
        let parts = parts(
            Request::builder()
                .uri("/auth/login?next=%2F&locale=fr-FR")
                .header("Cookie", "locale=ja-JP"),
        );
        assert_eq!(locale_from_request(&parts), "fr-FR");
    }

    #[test]
    fn cookie_is_used_last() {
        let parts = parts(
            Request::builder()
                .uri("/auth/login")
                .header("Cookie", "session=abc; locale=ja-JP"),
        );
        assert_eq!(locale_from_request(&parts), "ja-JP");
    }
}
