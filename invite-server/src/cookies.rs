//! Unlock flags carried in cookies.

use std::collections::HashMap;

use axum::http::HeaderMap;
use axum::http::header::COOKIE;
use invite_core::error::InviteResult;
use invite_core::gate::{UnlockStore, unlock_key};

const ONE_YEAR: u64 = 365 * 24 * 60 * 60;

/// Reads flags from the request's `Cookie` header and collects the
/// `Set-Cookie` values the response has to carry.
#[derive(Debug, Default)]
pub struct CookieUnlockStore {
    cookies: HashMap<String, String>,
    set_cookies: Vec<String>,
}

impl CookieUnlockStore {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let cookies = headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|header| header.split(';'))
            .filter_map(|pair| {
                let (name, value) = pair.trim().split_once('=')?;
                Some((name.to_string(), value.to_string()))
            })
            .collect();

        CookieUnlockStore {
            cookies,
            set_cookies: Vec::new(),
        }
    }

    pub fn set_cookies(&self) -> &[String] {
        &self.set_cookies
    }
}

impl UnlockStore for CookieUnlockStore {
    fn is_unlocked(&self, slug: &str) -> bool {
        self.cookies.get(&unlock_key(slug)).map(String::as_str) == Some("true")
    }

    fn set_unlocked(&mut self, slug: &str) -> InviteResult<()> {
        let key = unlock_key(slug);
        self.set_cookies.push(format!(
            "{key}=true; Path=/weddings; Max-Age={ONE_YEAR}; HttpOnly; SameSite=Lax"
        ));
        self.cookies.insert(key, "true".to_string());
        Ok(())
    }

    fn clear(&mut self, slug: &str) -> InviteResult<()> {
        let key = unlock_key(slug);
        self.set_cookies
            .push(format!("{key}=; Path=/weddings; Max-Age=0; HttpOnly; SameSite=Lax"));
        self.cookies.remove(&key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn reads_flag_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; weddings-asha-rohan-unlocked=true"),
        );
        let store = CookieUnlockStore::from_headers(&headers);

        assert!(store.is_unlocked("asha-rohan"));
        assert!(!store.is_unlocked("meera-dev"));
    }

    #[test]
    fn only_true_counts() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("weddings-asha-rohan-unlocked=yes"),
        );
        assert!(!CookieUnlockStore::from_headers(&headers).is_unlocked("asha-rohan"));
    }

    #[test]
    fn set_and_clear_emit_cookies() {
        let mut store = CookieUnlockStore::default();
        store.set_unlocked("asha-rohan").unwrap();
        assert!(store.is_unlocked("asha-rohan"));
        assert!(store.set_cookies()[0].starts_with("weddings-asha-rohan-unlocked=true;"));

        store.clear("asha-rohan").unwrap();
        assert!(!store.is_unlocked("asha-rohan"));
        assert!(store.set_cookies()[1].contains("Max-Age=0"));
    }
}
