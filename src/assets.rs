//! Acquisition of the Japanese font asset.
//!
//! Getting the font is a separate, fallible step that runs before any document
//! is built. The renderer itself never touches the network or the font file.

use crate::error::PipelineError;
use sheets_layout::{DEFAULT_FONT, FallbackPolicy, FontLibrary};
use std::path::{Path, PathBuf};

pub const FONT_FILENAME: &str = "KleeOne-Regular.ttf";
pub const FONT_URL: &str =
    "https://github.com/fontworks-fonts/Klee/raw/master/fonts/ttf/KleeOne-Regular.ttf";
/// Family name the worksheet styles refer to.
pub const FONT_FAMILY: &str = "JapaneseFont";

/// How many leading bytes are checked for an HTML error page.
const SNIFF_LEN: usize = 100;

/// Retrieves a remote asset.
pub trait AssetFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, PipelineError>;
}

/// Blocking HTTPS download that follows redirects. Failures are not retried.
#[cfg(feature = "download")]
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpFetcher;

#[cfg(feature = "download")]
impl AssetFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, PipelineError> {
        let fail = |e: reqwest::Error| PipelineError::NetworkFetch {
            url: url.to_string(),
            reason: e.to_string(),
        };
        let client = reqwest::blocking::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(fail)?;
        let response = client.get(url).send().map_err(fail)?;
        let body = response.error_for_status().map_err(fail)?.bytes().map_err(fail)?;
        Ok(body.to_vec())
    }
}

/// A fetcher for builds without network support; every fetch fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineFetcher;

impl AssetFetcher for OfflineFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, PipelineError> {
        Err(PipelineError::NetworkFetch {
            url: url.to_string(),
            reason: "network access is disabled in this build".to_string(),
        })
    }
}

/// Rejects bodies that cannot be a font: empty ones, and HTML error pages
/// served in place of the file.
pub fn check_font_payload(url: &str, bytes: &[u8]) -> Result<(), PipelineError> {
    let malformed = |reason: &str| PipelineError::MalformedRemoteAsset {
        url: url.to_string(),
        reason: reason.to_string(),
    };
    if bytes.is_empty() {
        return Err(malformed("empty response body"));
    }
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(SNIFF_LEN)]).to_ascii_lowercase();
    if head.contains("<!doctype html") || head.contains("<html") {
        return Err(malformed("got HTML instead of a TrueType font"));
    }
    Ok(())
}

/// A font file on disk, optionally backed by a download location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontAsset {
    pub path: PathBuf,
    pub url: Option<String>,
}

impl FontAsset {
    /// Klee One Regular in `dir`, downloaded from Fontworks when missing.
    pub fn klee_one(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(FONT_FILENAME),
            url: Some(FONT_URL.to_string()),
        }
    }

    /// A font that must already exist at `path`.
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            url: None,
        }
    }

    /// Returns the font bytes, downloading and saving them first if the file is absent.
    pub fn acquire(&self, fetcher: &dyn AssetFetcher) -> Result<Vec<u8>, PipelineError> {
        if self.path.exists() {
            log::debug!("Using font asset {}", self.path.display());
            return std::fs::read(&self.path).map_err(|e| PipelineError::io(&self.path, e));
        }
        let Some(url) = &self.url else {
            return Err(PipelineError::FontAssetMissing(self.path.clone()));
        };

        log::info!("Downloading font {} from {}", self.path.display(), url);
        let bytes = fetcher.fetch(url)?;
        check_font_payload(url, &bytes)?;
        match std::fs::write(&self.path, &bytes) {
            Ok(()) => log::info!("Saved font to {} ({} bytes)", self.path.display(), bytes.len()),
            Err(e) => log::warn!(
                "Could not save font to {}: {}; using the downloaded copy for this run",
                self.path.display(),
                e
            ),
        }
        Ok(bytes)
    }
}

/// What to try when the font asset cannot be used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontSetup {
    /// Render with Helvetica instead of failing. Japanese glyphs come out missing.
    pub allow_fallback: bool,
    /// Installed families to look for before falling back.
    pub system_candidates: Vec<String>,
}

/// How the Japanese font family ended up being provided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontOutcome {
    /// The asset file was registered.
    Registered { path: PathBuf },
    /// An installed system font was registered instead.
    System { name: String },
    /// Nothing usable; text renders with the builtin font.
    Fallback { reason: String },
}

impl FontOutcome {
    pub fn is_fallback(&self) -> bool {
        matches!(self, FontOutcome::Fallback { .. })
    }
}

/// Acquires `asset` and registers it as [`FONT_FAMILY`] in `fonts`.
pub fn install_font(
    fonts: &mut FontLibrary,
    asset: &FontAsset,
    fetcher: &dyn AssetFetcher,
    setup: &FontSetup,
) -> Result<FontOutcome, PipelineError> {
    let registered = asset
        .acquire(fetcher)
        .and_then(|data| fonts.register_truetype(FONT_FAMILY, data).map_err(PipelineError::from));
    let err = match registered {
        Ok(face) => {
            log::info!(
                "Registered '{}' from {} as {}",
                face.postscript_name(),
                asset.path.display(),
                FONT_FAMILY
            );
            return Ok(FontOutcome::Registered {
                path: asset.path.clone(),
            });
        }
        Err(err) => err,
    };
    log::warn!("Font asset unavailable ({}): {}", err.kind(), err);

    if let Some(name) = try_system_font(fonts, setup) {
        return Ok(FontOutcome::System { name });
    }

    if !setup.allow_fallback {
        return Err(err);
    }
    fonts.set_fallback(FallbackPolicy::Builtin);
    log::warn!(
        "Japanese text will render with {} and show missing glyphs",
        DEFAULT_FONT
    );
    Ok(FontOutcome::Fallback {
        reason: err.to_string(),
    })
}

#[cfg(feature = "system-fonts")]
fn try_system_font(fonts: &mut FontLibrary, setup: &FontSetup) -> Option<String> {
    if setup.system_candidates.is_empty() {
        return None;
    }
    let candidates: Vec<&str> = setup.system_candidates.iter().map(String::as_str).collect();
    match fonts.register_system_font(FONT_FAMILY, &candidates) {
        Ok(face) => {
            log::info!("Using installed font '{}' as {}", face.postscript_name(), FONT_FAMILY);
            Some(face.postscript_name().to_string())
        }
        Err(e) => {
            log::debug!("{}", e);
            None
        }
    }
}

#[cfg(not(feature = "system-fonts"))]
fn try_system_font(_fonts: &mut FontLibrary, _setup: &FontSetup) -> Option<String> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_bodies_are_rejected() {
        let page = b"<!DOCTYPE html><html><body>Not Found</body></html>";
        let err = check_font_payload(FONT_URL, page).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedRemoteAsset { .. }));

        let lowercase = b"\n  <html lang=\"en\">";
        assert!(check_font_payload(FONT_URL, lowercase).is_err());
        assert!(check_font_payload(FONT_URL, b"").is_err());
    }

    #[test]
    fn html_marker_past_the_sniffed_prefix_is_ignored() {
        let mut body = vec![0u8; SNIFF_LEN];
        body.extend_from_slice(b"<html>");
        assert!(check_font_payload(FONT_URL, &body).is_ok());
    }

    #[test]
    fn offline_fetcher_always_fails() {
        let err = OfflineFetcher.fetch(FONT_URL).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::NetworkFetchFailure);
    }
}
