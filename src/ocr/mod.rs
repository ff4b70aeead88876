mod preprocess;
mod tesseract;

use anyhow::{Context, Result};
use std::io::Write;
use tracing::debug;

pub use tesseract::list_tesseract_languages;

use crate::settings::Settings;

/// Turns an image into raw text. Implementations make no promise about the
/// structure of what they return.
pub trait OcrEngine {
    fn recognize(&self, image_bytes: &[u8]) -> Result<String>;
}

/// Runs the `tesseract` binary over a preprocessed copy of the image.
#[derive(Debug, Clone)]
pub struct Tesseract {
    pub languages: String,
    pub psm: u32,
    pub preprocess: bool,
}

impl Tesseract {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            languages: settings.ocr_languages.clone(),
            psm: settings.ocr_psm,
            preprocess: settings.ocr_preprocess,
        }
    }
}

impl OcrEngine for Tesseract {
    fn recognize(&self, image_bytes: &[u8]) -> Result<String> {
        let image = image::load_from_memory(image_bytes)
            .with_context(|| "failed to decode image for OCR")?;
        let languages = tesseract::normalize_ocr_languages(&self.languages)?;
        let ocr_image = if self.preprocess {
            preprocess::preprocess_for_ocr(image)
        } else {
            image
        };

        let mut tmp = tempfile::Builder::new()
            .suffix(".png")
            .tempfile()
            .with_context(|| "failed to create temp file for OCR")?;
        ocr_image
            .write_to(&mut tmp, image::ImageFormat::Png)
            .with_context(|| "failed to write temp image for OCR")?;
        tmp.flush().ok();

        debug!(
            "ocr: tesseract -l {} --psm {} ({}x{})",
            languages,
            self.psm,
            ocr_image.width(),
            ocr_image.height()
        );
        tesseract::run_tesseract_text(tmp.path(), &languages, self.psm)
    }
}
