//! Stream URL resolution and source comparison.
//!
//! Stored songs are referenced either by an opaque id or by a legacy filename.
//! Both resolve to a deterministic path under the API base; every request adds
//! a cache-busting query parameter, which is why [`same_source`] tolerates one
//! URL being a superset of the other.

use crate::constants::CACHE_BUST_PARAM;
use crate::error::{ClipError, Result};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SongRef {
    Id(String),
    Filename(String),
}

impl SongRef {
    /// Prefer the id when one is stored, fall back to the filename
    pub fn from_stored(id: Option<&str>, filename: Option<&str>) -> Option<Self> {
        match (id, filename) {
            (Some(id), _) if !id.trim().is_empty() => Some(Self::Id(id.trim().to_string())),
            (_, Some(name)) if !name.trim().is_empty() => {
                Some(Self::Filename(name.trim().to_string()))
            }
            _ => None,
        }
    }
}

fn join_segments(base: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base)
        .map_err(|e| ClipError::validation(format!("Invalid API base URL '{base}': {e}")))?;
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|_| ClipError::validation(format!("API base URL '{base}' cannot be a base")))?;
        path.pop_if_empty();
        path.extend(segments);
    }
    Ok(url)
}

/// `{base}/stream/id/{id}` or `{base}/stream/{filename}`
pub fn stream_url(base: &str, song: &SongRef) -> Result<Url> {
    match song {
        SongRef::Id(id) => join_segments(base, &["stream", "id", id]),
        SongRef::Filename(name) => join_segments(base, &["stream", name]),
    }
}

/// Append the cache-busting parameter to a resolved URL
pub fn with_cache_bust(mut url: Url, stamp: i64) -> Url {
    url.query_pairs_mut()
        .append_pair(CACHE_BUST_PARAM, &stamp.to_string());
    url
}

/// Resolve and cache-bust with the current wall clock in milliseconds
pub fn playable_url(base: &str, song: &SongRef) -> Result<Url> {
    let stamp = chrono::Utc::now().timestamp_millis();
    Ok(with_cache_bust(stream_url(base, song)?, stamp))
}

/// Scheme-qualified absolute form of a source string.
///
/// Relative paths and bare filesystem paths are qualified with `file://`.
pub fn normalize_source(source: &str) -> String {
    let trimmed = source.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    if let Ok(url) = Url::parse(trimmed) {
        return url.to_string();
    }
    let path = std::path::Path::new(trimmed);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|dir| dir.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };
    Url::from_file_path(&absolute)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| trimmed.to_string())
}

/// Whether two sources refer to the same stream, ignoring an extra
/// cache-busting suffix on either side
pub fn same_source(a: &str, b: &str) -> bool {
    let a = normalize_source(a);
    let b = normalize_source(b);
    if a.is_empty() || b.is_empty() {
        return a == b;
    }
    a.contains(&b) || b.contains(&a)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://api.example.com/api";

    #[test]
    fn test_stream_url_by_id() {
        let url = stream_url(BASE, &SongRef::Id("abc123".into())).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/api/stream/id/abc123");
    }

    #[test]
    fn test_stream_url_by_filename_is_escaped() {
        let url = stream_url(BASE, &SongRef::Filename("my song.mp3".into())).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/api/stream/my%20song.mp3"
        );
    }

    #[test]
    fn test_stream_url_trailing_slash_base() {
        let url = stream_url("https://api.example.com/api/", &SongRef::Id("7".into())).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/api/stream/id/7");
    }

    #[test]
    fn test_stream_url_invalid_base() {
        assert!(stream_url("not a url", &SongRef::Id("7".into())).is_err());
    }

    #[test]
    fn test_from_stored_prefers_id() {
        assert_eq!(
            SongRef::from_stored(Some("42"), Some("old.mp3")),
            Some(SongRef::Id("42".into()))
        );
        assert_eq!(
            SongRef::from_stored(Some("  "), Some("old.mp3")),
            Some(SongRef::Filename("old.mp3".into()))
        );
        assert_eq!(SongRef::from_stored(None, None), None);
    }

    #[test]
    fn test_cache_bust() {
        let url = stream_url(BASE, &SongRef::Id("9".into())).unwrap();
        let busted = with_cache_bust(url, 1700000000000);
        assert_eq!(
            busted.as_str(),
            "https://api.example.com/api/stream/id/9?t=1700000000000"
        );
    }

    #[test]
    fn test_same_source_tolerates_cache_bust() {
        let plain = "https://api.example.com/api/stream/id/9";
        let busted = "https://api.example.com/api/stream/id/9?t=1700000000000";
        assert!(same_source(plain, busted));
        assert!(same_source(busted, plain));
        assert!(!same_source(plain, "https://api.example.com/api/stream/id/10"));
    }

    #[test]
    fn test_same_source_scheme_qualified() {
        assert!(same_source("/tmp/clip.wav", "file:///tmp/clip.wav"));
        assert!(!same_source("", "file:///tmp/clip.wav"));
        assert!(same_source("", ""));
    }
}
