use crate::domain::model::CsrfToken;
use crate::utils::error::Result;
use reqwest::header::SET_COOKIE;
use reqwest::Client;

pub const DEFAULT_CSRF_COOKIE: &str = "csrftoken";
pub const DEFAULT_CSRF_HEADER: &str = "X-CSRFToken";

/// Looks up `name` in a `Cookie`-style string (`a=1; csrftoken=xyz`) and
/// percent-decodes its value.
pub fn csrf_from_cookie_str(cookies: &str, name: &str) -> Option<CsrfToken> {
    if cookies.is_empty() {
        return None;
    }

    let raw = cookies
        .split(';')
        .map(str::trim)
        .find_map(|cookie| cookie.strip_prefix(name)?.strip_prefix('='))?;

    match urlencoding::decode(raw) {
        Ok(decoded) => Some(CsrfToken::new(decoded.into_owned())),
        Err(e) => {
            tracing::warn!("Cookie '{}' is not valid percent-encoded UTF-8: {}", name, e);
            None
        }
    }
}

/// GETs the form page and reads the CSRF cookie from its `Set-Cookie` headers.
pub async fn fetch_csrf_token(
    client: &Client,
    page_url: &str,
    name: &str,
) -> Result<Option<CsrfToken>> {
    tracing::debug!("Fetching CSRF cookie from {}", page_url);
    let response = client.get(page_url).send().await?;
    tracing::debug!("CSRF page response status: {}", response.status());

    let token = response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .find_map(|pair| csrf_from_cookie_str(pair, name));

    if token.is_none() {
        tracing::warn!("No '{}' cookie set by {}", name, page_url);
    }
    Ok(token)
}
