use anyhow::{Context, Result, anyhow};
use std::path::Path;
use std::process::Command;
use tracing::warn;

pub fn list_tesseract_languages() -> Result<Vec<String>> {
    let output = Command::new("tesseract")
        .arg("--list-langs")
        .output()
        .with_context(|| "failed to run tesseract --list-langs")?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow!("tesseract --list-langs failed: {}", stderr.trim()));
    }
    Ok(parse_language_list(&String::from_utf8_lossy(&output.stdout)))
}

fn parse_language_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .skip(1)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

/// Resolves a user language list ("eng+hin", "eng, hin") to the `-l` value,
/// dropping languages tesseract does not have installed.
pub(super) fn normalize_ocr_languages(requested: &str) -> Result<String> {
    let available = list_tesseract_languages().ok();
    select_languages(requested, available.as_deref())
}

fn select_languages(requested: &str, available: Option<&[String]>) -> Result<String> {
    let trimmed = requested.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("ocr languages is empty"));
    }
    let requested: Vec<&str> = trimmed
        .split(['+', ',', ' '])
        .map(str::trim)
        .filter(|lang| !lang.is_empty())
        .collect();

    let Some(available) = available else {
        return Ok(requested.join("+"));
    };

    let (chosen, missing): (Vec<&str>, Vec<&str>) = requested
        .into_iter()
        .partition(|lang| available.iter().any(|value| value.as_str() == *lang));

    if chosen.is_empty() {
        return Err(anyhow!(
            "ocr language(s) not available: {} (available: {})",
            missing.join(", "),
            available.join(", ")
        ));
    }
    if !missing.is_empty() {
        warn!(
            "ocr language(s) not available: {} (available: {})",
            missing.join(", "),
            available.join(", ")
        );
    }

    Ok(chosen.join("+"))
}

pub(super) fn run_tesseract_text(path: &Path, languages: &str, psm: u32) -> Result<String> {
    let output = Command::new("tesseract")
        .arg(path)
        .arg("stdout")
        .arg("-l")
        .arg(languages)
        .arg("--psm")
        .arg(psm.to_string())
        .output()
        .with_context(|| "failed to run tesseract (is it installed?)")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow!("tesseract failed: {}", stderr.trim()));
    }
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn langs(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn parses_list_langs_output() {
        let stdout = "List of available languages in \"/usr/share/tessdata/\" (3):\neng\nhin\n\nosd\n";
        assert_eq!(parse_language_list(stdout), langs(&["eng", "hin", "osd"]));
    }

    #[test]
    fn keeps_requested_languages_when_list_is_unknown() {
        let selected = select_languages(" eng, hin ", None).expect("languages");
        assert_eq!(selected, "eng+hin");
    }

    #[test]
    fn drops_missing_languages() {
        let available = langs(&["eng", "osd"]);
        let selected = select_languages("eng+hin", Some(&available)).expect("languages");
        assert_eq!(selected, "eng");
    }

    #[test]
    fn rejects_when_nothing_is_installed() {
        let available = langs(&["osd"]);
        let err = select_languages("hin", Some(&available)).unwrap_err();
        assert!(err.to_string().contains("not available"));
        assert!(select_languages("  ", Some(&available)).is_err());
    }
}
