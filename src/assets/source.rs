use std::path::{Path, PathBuf};

use anyhow::Context as _;
use base64::Engine as _;

use crate::foundation::error::{EditorError, EditorResult};

/// Whether pixels of a fetched image may be read back after drawing.
///
/// Mirrors the browser rule that a canvas tainted by a cross-origin image cannot be exported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PixelAccess {
    /// Pixels may be extracted.
    #[default]
    Readable,
    /// The image may be displayed, but exporting the composite must fail.
    Restricted,
}

/// Encoded image bytes delivered by the host.
#[derive(Clone, Debug)]
pub struct FetchedImage {
    /// Encoded image bytes (PNG, JPEG, GIF first frame, WebP, ...).
    pub bytes: Vec<u8>,
    /// Readback permission of the source.
    pub pixel_access: PixelAccess,
}

impl FetchedImage {
    /// Readable image bytes.
    pub fn readable(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            pixel_access: PixelAccess::Readable,
        }
    }
}

/// Host surface that resolves a source image reference into bytes.
pub trait ImageSource {
    /// Fetch the image addressed by `url`.
    fn fetch(&self, url: &str) -> EditorResult<FetchedImage>;
}

impl<F> ImageSource for F
where
    F: Fn(&str) -> EditorResult<FetchedImage>,
{
    fn fetch(&self, url: &str) -> EditorResult<FetchedImage> {
        self(url)
    }
}

/// Resolves plain paths, `file://` URLs and `data:` URLs.
///
/// Relative paths are resolved against `root`. Network URLs are not fetched.
#[derive(Clone, Debug)]
pub struct LocalImageSource {
    root: PathBuf,
}

impl LocalImageSource {
    /// Source resolving relative paths against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn read_path(&self, path: &Path) -> EditorResult<Vec<u8>> {
        std::fs::read(path)
            .with_context(|| format!("read image bytes from '{}'", path.display()))
            .map_err(|e| EditorError::load(format!("{e:#}")))
    }
}

impl ImageSource for LocalImageSource {
    #[tracing::instrument(skip(self), fields(root = %self.root.display()))]
    fn fetch(&self, url: &str) -> EditorResult<FetchedImage> {
        if let Some(rest) = url.strip_prefix("data:") {
            return Ok(FetchedImage::readable(parse_data_url(rest)?));
        }
        if url.starts_with("http://") || url.starts_with("https://") {
            return Err(EditorError::load(format!(
                "remote image sources are not fetched locally: {url}"
            )));
        }
        if let Some(path) = url.strip_prefix("file://") {
            return Ok(FetchedImage::readable(self.read_path(Path::new(path))?));
        }

        let path = Path::new(url);
        if path.is_absolute() {
            return Ok(FetchedImage::readable(self.read_path(path)?));
        }
        let norm = normalize_rel_path(url)?;
        let full = self.root.join(Path::new(&norm));
        Ok(FetchedImage::readable(self.read_path(&full)?))
    }
}

/// Decode the part of a `data:` URL after the scheme: `[<mediatype>][;base64],<payload>`.
pub(crate) fn parse_data_url(rest: &str) -> EditorResult<Vec<u8>> {
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| EditorError::load("data url is missing ','"))?;
    if meta.split(';').any(|p| p.eq_ignore_ascii_case("base64")) {
        base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| EditorError::load(format!("invalid base64 payload in data url: {e}")))
    } else {
        Ok(payload.as_bytes().to_vec())
    }
}

/// Normalize and validate relative image paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects parent traversals
/// (`..`).
pub(crate) fn normalize_rel_path(source: &str) -> EditorResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(EditorError::validation("image paths must be relative"));
    }
    if s.is_empty() {
        return Err(EditorError::validation("image path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(EditorError::validation("image paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(EditorError::validation(
            "image path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
