use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::paths;

const DEFAULT_SETTINGS_TOML: &str = include_str!("../settings.toml");

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub ocr_languages: String,
    pub ocr_psm: u32,
    pub ocr_preprocess: bool,
    pub output_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ocr_languages: "eng".to_string(),
            ocr_psm: 3,
            ocr_preprocess: true,
            output_dir: PathBuf::from("generated"),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    ocr: Option<OcrSettings>,
    output: Option<OutputSettings>,
}

#[derive(Debug, Default, Deserialize)]
struct OcrSettings {
    languages: Option<String>,
    psm: Option<u32>,
    preprocess: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct OutputSettings {
    dir: Option<String>,
}

/// Loads settings from the working directory, the per-user directory and
/// finally `extra_path`, later files overriding earlier ones.
pub fn load_settings(extra_path: Option<&Path>) -> Result<Settings> {
    let home = paths::settings_dir();
    if let Some(home) = home.as_deref() {
        ensure_home_settings_file(home)?;
    }
    load_settings_from(Path::new("."), home.as_deref(), extra_path)
}

pub(crate) fn load_settings_from(
    work_dir: &Path,
    home: Option<&Path>,
    extra_path: Option<&Path>,
) -> Result<Settings> {
    let mut settings = Settings::default();

    let mut ordered_paths = vec![
        work_dir.join("settings.toml"),
        work_dir.join("settings.local.toml"),
    ];
    if let Some(home) = home {
        ordered_paths.push(home.join("settings.toml"));
        ordered_paths.push(home.join("settings.local.toml"));
    }
    if let Some(extra) = extra_path {
        if !extra.exists() {
            return Err(anyhow!("settings file not found: {}", extra.display()));
        }
        ordered_paths.push(extra.to_path_buf());
    }

    for path in ordered_paths {
        if path.exists() {
            debug!("settings: reading {}", path.display());
            let content = fs::read_to_string(&path)
                .with_context(|| format!("failed to read settings: {}", path.display()))?;
            let parsed: SettingsFile = toml::from_str(&content)
                .with_context(|| format!("failed to parse settings: {}", path.display()))?;
            settings.merge(parsed);
        }
    }

    Ok(settings)
}

impl Settings {
    fn merge(&mut self, incoming: SettingsFile) {
        if let Some(ocr) = incoming.ocr {
            if let Some(languages) = ocr.languages {
                if !languages.trim().is_empty() {
                    self.ocr_languages = languages.trim().to_string();
                }
            }
            if let Some(psm) = ocr.psm {
                if psm > 0 {
                    self.ocr_psm = psm;
                }
            }
            if let Some(preprocess) = ocr.preprocess {
                self.ocr_preprocess = preprocess;
            }
        }
        if let Some(output) = incoming.output {
            if let Some(dir) = output.dir.as_deref().and_then(paths::normalize_dir) {
                self.output_dir = dir;
            }
        }
    }
}

fn ensure_home_settings_file(home: &Path) -> Result<()> {
    fs::create_dir_all(home)
        .with_context(|| format!("failed to create settings directory: {}", home.display()))?;
    let path = home.join("settings.toml");
    if !path.exists() {
        fs::write(&path, DEFAULT_SETTINGS_TOML)
            .with_context(|| format!("failed to write settings: {}", path.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn bundled_defaults_match_builtin_defaults() {
        let parsed: SettingsFile = toml::from_str(DEFAULT_SETTINGS_TOML).expect("parse defaults");
        let mut settings = Settings::default();
        settings.merge(parsed);
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn later_files_override_earlier_ones() {
        let work = tempdir().expect("tempdir");
        let home = tempdir().expect("tempdir");
        fs::write(
            work.path().join("settings.toml"),
            "[ocr]\nlanguages = \"eng+hin\"\npsm = 6\n",
        )
        .expect("write work settings");
        fs::write(
            home.path().join("settings.toml"),
            "[ocr]\npsm = 4\n[output]\ndir = \"certs\"\n",
        )
        .expect("write home settings");
        let extra = work.path().join("extra.toml");
        fs::write(&extra, "[ocr]\npreprocess = false\n").expect("write extra");

        let settings =
            load_settings_from(work.path(), Some(home.path()), Some(&extra)).expect("settings");
        assert_eq!(settings.ocr_languages, "eng+hin");
        assert_eq!(settings.ocr_psm, 4);
        assert!(!settings.ocr_preprocess);
        assert_eq!(settings.output_dir, PathBuf::from("certs"));
    }

    #[test]
    fn blank_values_are_ignored() {
        let work = tempdir().expect("tempdir");
        fs::write(
            work.path().join("settings.local.toml"),
            "[ocr]\nlanguages = \"  \"\npsm = 0\n[output]\ndir = \"\"\n",
        )
        .expect("write settings");

        let settings = load_settings_from(work.path(), None, None).expect("settings");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn missing_extra_file_is_an_error() {
        let work = tempdir().expect("tempdir");
        let missing = work.path().join("nope.toml");
        let err = load_settings_from(work.path(), None, Some(&missing)).unwrap_err();
        assert!(err.to_string().contains("settings file not found"));
    }

    #[test]
    fn home_settings_file_is_seeded_once() {
        let home = tempdir().expect("tempdir");
        let dir = home.path().join(".life-certificate");
        ensure_home_settings_file(&dir).expect("seed");
        let path = dir.join("settings.toml");
        assert_eq!(fs::read_to_string(&path).expect("read"), DEFAULT_SETTINGS_TOML);

        fs::write(&path, "[ocr]\npsm = 11\n").expect("overwrite");
        ensure_home_settings_file(&dir).expect("seed again");
        assert_eq!(fs::read_to_string(&path).expect("read"), "[ocr]\npsm = 11\n");
    }
}
