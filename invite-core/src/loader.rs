//! Fetching details documents.

use reqwest::header::{CACHE_CONTROL, PRAGMA};
use tracing::debug;

use crate::config::InviteConfig;
use crate::details::Details;
use crate::error::{InviteError, InviteResult};

/// Load a details document from an `http(s)://` URL or a local path.
///
/// Remote documents are always revalidated. Any unsuccessful response or a
/// missing file is [`InviteError::NotFound`]; nothing is cached, so the
/// next call tries again.
pub async fn load(details_url: &str) -> InviteResult<Details> {
    let raw = if is_remote(details_url) {
        fetch(details_url).await?
    } else {
        read_file(details_url)?
    };

    debug!(source = details_url, "loaded details");
    Details::from_json(&raw)
}

/// Load `<data_dir>/<slug>.json`.
pub fn load_slug(config: &InviteConfig, slug: &str) -> InviteResult<Details> {
    let path = config.details_path(slug);
    let raw = read_file(&path.to_string_lossy())?;
    Details::from_json(&raw)
}

pub fn is_remote(details_url: &str) -> bool {
    details_url.starts_with("http://") || details_url.starts_with("https://")
}

async fn fetch(url: &str) -> InviteResult<String> {
    let response = reqwest::Client::new()
        .get(url)
        .header(CACHE_CONTROL, "no-cache")
        .header(PRAGMA, "no-cache")
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(InviteError::NotFound(format!(
            "{url} ({})",
            response.status()
        )));
    }

    Ok(response.text().await?)
}

fn read_file(path: &str) -> InviteResult<String> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => InviteError::NotFound(path.to_string()),
        _ => InviteError::Io(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ghost.json");

        let err = load(&path.to_string_lossy()).await.unwrap_err();
        assert!(matches!(err, InviteError::NotFound(_)));
    }

    #[tokio::test]
    async fn loads_local_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("asha-rohan.json");
        std::fs::write(&path, r#"{"coupleNames": "Asha & Rohan"}"#).unwrap();

        let details = load(&path.to_string_lossy()).await.unwrap();
        assert_eq!(details.couple_names.as_deref(), Some("Asha & Rohan"));
    }

    #[test]
    fn load_slug_reads_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("meera-dev.json"), r#"{"coupleNames": "Meera & Dev"}"#)
            .unwrap();
        let config = InviteConfig {
            data_dir: dir.path().to_path_buf(),
            ..InviteConfig::default()
        };

        let details = load_slug(&config, "meera-dev").unwrap();
        assert_eq!(details.couple_names.as_deref(), Some("Meera & Dev"));
        assert!(matches!(
            load_slug(&config, "nobody"),
            Err(InviteError::NotFound(_))
        ));
    }

    #[test]
    fn only_http_urls_are_remote() {
        assert!(is_remote("https://example.com/weddings/data/a.json"));
        assert!(!is_remote("public/weddings/data/a.json"));
    }
}
