use anyhow::{Context, Result, anyhow};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub mod extract;
pub mod logging;
pub mod ocr;
mod paths;
pub mod photo;
pub mod record;
pub mod render;
pub mod settings;
#[cfg(test)]
mod test_util;

pub use extract::{extract, extract_matches};
pub use ocr::{OcrEngine, Tesseract};
pub use photo::PhotoAsset;
pub use record::{BeneficiaryRecord, DEFAULT_VALUE, Field};
pub use render::{CertificateDocument, RenderError, render};
pub use settings::Settings;

/// Reads OCR text from stdin when passed as the text path.
pub const STDIN_PATH: &str = "-";

#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Screenshot to OCR. Exactly one of `image` and `text` must be set.
    pub image: Option<PathBuf>,
    /// Previously captured OCR text.
    pub text: Option<PathBuf>,
    pub photo: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub ocr_lang: Option<String>,
    pub psm: Option<u32>,
    pub no_pdf: bool,
    pub settings_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct RunOutput {
    pub text: String,
    pub record: BeneficiaryRecord,
    pub pdf_path: Option<PathBuf>,
}

/// Loads settings, builds the tesseract engine and runs the pipeline.
pub fn run(config: Config) -> Result<RunOutput> {
    let mut settings = settings::load_settings(config.settings_path.as_deref())?;
    if let Some(lang) = config.ocr_lang.as_deref().map(str::trim) {
        if !lang.is_empty() {
            settings.ocr_languages = lang.to_string();
        }
    }
    if let Some(psm) = config.psm {
        settings.ocr_psm = psm;
    }
    let engine = Tesseract::from_settings(&settings);
    run_with_engine(&config, &settings, &engine)
}

/// The pipeline with the OCR engine supplied by the caller:
/// `render(extract(ocr(image)), photo)`, written to disk unless `no_pdf`.
pub fn run_with_engine(
    config: &Config,
    settings: &Settings,
    engine: &dyn OcrEngine,
) -> Result<RunOutput> {
    let (source, text) = match (config.image.as_deref(), config.text.as_deref()) {
        (Some(image), None) => {
            let bytes = fs::read(image)
                .with_context(|| format!("failed to read image: {}", image.display()))?;
            info!("ocr: {} ({} bytes)", image.display(), bytes.len());
            let text = engine
                .recognize(&bytes)
                .with_context(|| format!("OCR failed for {}", image.display()))?;
            (bytes, text)
        }
        (None, Some(path)) => {
            let text = read_text(path)?;
            (text.clone().into_bytes(), text)
        }
        (Some(_), Some(_)) => return Err(anyhow!("--image and --text are mutually exclusive")),
        (None, None) => return Err(anyhow!("one of --image or --text is required")),
    };
    debug!("ocr text: {} chars", text.chars().count());

    let record = extract(&text);
    info!(
        "extracted {}/{} fields",
        record.matched_count(),
        Field::ALL.len()
    );

    if config.no_pdf {
        return Ok(RunOutput {
            text,
            record,
            pdf_path: None,
        });
    }

    let photo = config
        .photo
        .as_deref()
        .map(PhotoAsset::load)
        .transpose()?;
    let document = render(&record, photo.as_ref()).with_context(|| "failed to render certificate")?;

    let path = config
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&settings.output_dir, &source));
    write_document(&path, &document)?;
    info!("wrote {} ({} bytes)", path.display(), document.len());

    Ok(RunOutput {
        text,
        record,
        pdf_path: Some(path),
    })
}

fn read_text(path: &Path) -> Result<String> {
    if path == Path::new(STDIN_PATH) {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .with_context(|| "failed to read OCR text from stdin")?;
        return Ok(buffer);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read text: {}", path.display()))
}

/// `LifeCertificate-<md5 of the input>.pdf`, so reruns over the same
/// screenshot overwrite rather than accumulate.
pub fn default_output_path(dir: &Path, source: &[u8]) -> PathBuf {
    dir.join(format!("LifeCertificate-{:x}.pdf", md5::compute(source)))
}

fn write_document(path: &Path, document: &CertificateDocument) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory: {}", parent.display()))?;
    }
    fs::write(path, document.as_bytes())
        .with_context(|| format!("failed to write certificate: {}", path.display()))
}
