use std::{collections::HashMap, fs, path::Path};

use client_core::DEFAULT_API_URL;
use tracing::warn;

pub const SETTINGS_FILE: &str = "billed.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub session_path: String,
    pub upload: UploadPolicy,
}

/// Receipt acceptance rules applied before any upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    pub allowed_extensions: Vec<String>,
    pub default_vat_pct: i64,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            allowed_extensions: vec!["jpg".into(), "jpeg".into(), "png".into()],
            default_vat_pct: 20,
        }
    }
}

impl UploadPolicy {
    pub fn allows(&self, file_name: &str) -> bool {
        let Some((stem, extension)) = file_name.rsplit_once('.') else {
            return false;
        };
        !stem.is_empty()
            && self
                .allowed_extensions
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(extension))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            session_path: "./data/session.json".into(),
            upload: UploadPolicy::default(),
        }
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then the flat `key = "value"` file, then environment overrides.
pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<HashMap<String, String>>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.get("api_url") {
                    settings.api_url = v.clone();
                }
                if let Some(v) = file_cfg.get("session_path") {
                    settings.session_path = v.clone();
                }
                if let Some(v) = file_cfg.get("allowed_extensions") {
                    settings.upload.allowed_extensions = parse_extensions(v);
                }
                if let Some(v) = file_cfg.get("default_vat_pct") {
                    apply_vat_pct(&mut settings, v);
                }
            }
            Err(err) => warn!(path = %path.display(), error = %err, "config: ignoring unreadable settings file"),
        }
    }

    if let Some(v) = env("BILLED_API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = env("APP__API_URL") {
        settings.api_url = v;
    }

    if let Some(v) = env("BILLED_SESSION_PATH") {
        settings.session_path = v;
    }

    if let Some(v) = env("BILLED_ALLOWED_EXTENSIONS") {
        settings.upload.allowed_extensions = parse_extensions(&v);
    }

    if let Some(v) = env("BILLED_DEFAULT_VAT_PCT") {
        apply_vat_pct(&mut settings, &v);
    }

    settings
}

fn apply_vat_pct(settings: &mut Settings, raw: &str) {
    match raw.trim().parse::<i64>() {
        Ok(parsed) => settings.upload.default_vat_pct = parsed,
        Err(_) => warn!(value = raw, "config: ignoring non-numeric default vat pct"),
    }
}

fn parse_extensions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect()
}
