use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use life_certificate::{Config, logging, ocr};

#[derive(Parser, Debug)]
#[command(
    name = "life-certificate",
    version,
    about = "Rebuild an NSAP life certificate PDF from a screenshot"
)]
struct Cli {
    /// Screenshot of the certificate to OCR
    #[arg(short = 'i', long = "image", conflicts_with = "text", required_unless_present_any = ["text", "show_ocr_languages"])]
    image: Option<PathBuf>,

    /// Use existing OCR text instead of an image ("-" reads stdin)
    #[arg(short = 't', long = "text")]
    text: Option<PathBuf>,

    /// Already-cropped beneficiary photo to place above the details table
    #[arg(short = 'p', long = "photo")]
    photo: Option<PathBuf>,

    /// Output PDF path (default: <output.dir>/LifeCertificate-<md5>.pdf)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Tesseract languages, e.g. "eng+hin" (overrides settings [ocr].languages)
    #[arg(short = 'l', long = "ocr-lang")]
    ocr_lang: Option<String>,

    /// Tesseract page segmentation mode (overrides settings [ocr].psm)
    #[arg(long = "psm")]
    psm: Option<u32>,

    /// Print the OCR text to stdout
    #[arg(long = "dump-text")]
    dump_text: bool,

    /// Print the extracted fields as JSON to stdout
    #[arg(long = "dump-fields")]
    dump_fields: bool,

    /// Stop after extraction without writing a PDF
    #[arg(long = "no-pdf")]
    no_pdf: bool,

    /// Show installed tesseract languages and exit
    #[arg(long = "show-ocr-languages")]
    show_ocr_languages: bool,

    /// Read extra settings from a local TOML file
    #[arg(short = 'r', long = "read-settings")]
    read_settings: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long = "verbose")]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    if cli.show_ocr_languages {
        for lang in ocr::list_tesseract_languages()? {
            println!("{}", lang);
        }
        return Ok(());
    }

    let dump_text = cli.dump_text;
    let dump_fields = cli.dump_fields;
    let output = life_certificate::run(Config {
        image: cli.image,
        text: cli.text,
        photo: cli.photo,
        output: cli.output,
        ocr_lang: cli.ocr_lang,
        psm: cli.psm,
        no_pdf: cli.no_pdf,
        settings_path: cli.read_settings,
    })?;

    if dump_text {
        print!("{}", output.text);
        if !output.text.ends_with('\n') {
            println!();
        }
    }
    if dump_fields {
        println!("{}", serde_json::to_string_pretty(&output.record)?);
    }
    if let Some(path) = output.pdf_path {
        println!("{}", path.display());
    }
    Ok(())
}
