use anyhow::{Context, Result, anyhow};
use std::io::Cursor;
use std::path::Path;

/// An already-cropped beneficiary photograph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoAsset {
    bytes: Vec<u8>,
    mime: &'static str,
    width: u32,
    height: u32,
}

impl PhotoAsset {
    /// Accepts bytes only if they sniff as an image and their header decodes.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let mime = sniff_image_mime(&bytes)
            .ok_or_else(|| anyhow!("photo is not a recognised image format"))?;
        let (width, height) = image::ImageReader::new(Cursor::new(&bytes))
            .with_guessed_format()
            .with_context(|| "failed to read photo header")?
            .into_dimensions()
            .with_context(|| format!("failed to decode photo ({})", mime))?;
        if width == 0 || height == 0 {
            return Err(anyhow!("photo has no pixels"));
        }
        Ok(Self {
            bytes,
            mime,
            width,
            height,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read photo: {}", path.display()))?;
        Self::from_bytes(bytes).with_context(|| format!("invalid photo: {}", path.display()))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime(&self) -> &'static str {
        self.mime
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

pub(crate) fn sniff_image_mime(bytes: &[u8]) -> Option<&'static str> {
    let kind = infer::get(bytes)?;
    let detected = kind.mime_type();
    detected.starts_with("image/").then_some(detected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::png_bytes;

    #[test]
    fn accepts_png_and_reads_dimensions() {
        let photo = PhotoAsset::from_bytes(png_bytes(30, 38)).expect("photo");
        assert_eq!(photo.mime(), "image/png");
        assert_eq!(photo.dimensions(), (30, 38));
    }

    #[test]
    fn rejects_non_image_bytes() {
        let err = PhotoAsset::from_bytes(b"%PDF-1.3 not a photo".to_vec()).unwrap_err();
        assert!(err.to_string().contains("not a recognised image"));
    }

    #[test]
    fn rejects_truncated_image() {
        let mut bytes = png_bytes(10, 10);
        bytes.truncate(12);
        assert!(PhotoAsset::from_bytes(bytes).is_err());
    }

    #[test]
    fn load_reports_the_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing.png");
        let err = PhotoAsset::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("missing.png"));
    }
}
