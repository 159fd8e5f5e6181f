use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tauri::path::BaseDirectory;
use tauri::{AppHandle, Manager};

const CONFIG_DIR: &str = "voice-survey";
const CONFIG_FILE: &str = "config.json";

pub const DEFAULT_HOTKEY: &str = "CommandOrControl+Shift+Space";
pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_INACTIVITY_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub hotkey: String,
    pub language: String,
    pub inactivity_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            hotkey: DEFAULT_HOTKEY.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            inactivity_timeout_secs: DEFAULT_INACTIVITY_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsView {
    pub hotkey: String,
    pub language: String,
    pub inactivity_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsPayload {
    pub hotkey: Option<String>,
    pub language: Option<String>,
    pub inactivity_timeout_secs: Option<u64>,
}

pub fn normalize_hotkey(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        DEFAULT_HOTKEY.to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn normalize_language(input: &str) -> String {
    match input.trim().to_lowercase().as_str() {
        "en" => "en".to_string(),
        "pt" => "pt".to_string(),
        "auto" => "auto".to_string(),
        _ => DEFAULT_LANGUAGE.to_string(),
    }
}

// The watchdog delay gets a floor of one second so a bad config cannot stop
// capture immediately after start.
pub fn normalize_timeout_secs(secs: u64) -> u64 {
    secs.max(1)
}

pub fn load_or_create(app: &AppHandle) -> Result<AppConfig, String> {
    let path = config_path(app)?;
    if !path.exists() {
        let config = AppConfig::default();
        save_raw(&path, &config)?;
        return Ok(config);
    }

    let raw = fs::read_to_string(&path).map_err(|e| format!("Failed to read config: {}", e))?;
    match serde_json::from_str::<AppConfig>(&raw) {
        Ok(mut config) => {
            normalize_config(&mut config);
            Ok(config)
        }
        Err(_) => {
            let backup = path.with_extension("json.bak");
            let _ = fs::copy(&path, backup);
            let config = AppConfig::default();
            save_raw(&path, &config)?;
            Ok(config)
        }
    }
}

pub fn save(app: &AppHandle, config: &AppConfig) -> Result<(), String> {
    let path = config_path(app)?;
    save_raw(&path, config)
}

pub fn settings_view(config: &AppConfig) -> SettingsView {
    SettingsView {
        hotkey: normalize_hotkey(&config.hotkey),
        language: normalize_language(&config.language),
        inactivity_timeout_secs: normalize_timeout_secs(config.inactivity_timeout_secs),
    }
}

pub fn update_settings(app: &AppHandle, payload: UpdateSettingsPayload) -> Result<AppConfig, String> {
    let mut config = load_or_create(app)?;

    if let Some(hotkey) = payload.hotkey {
        config.hotkey = normalize_hotkey(&hotkey);
    }

    if let Some(language) = payload.language {
        config.language = normalize_language(&language);
    }

    if let Some(secs) = payload.inactivity_timeout_secs {
        config.inactivity_timeout_secs = normalize_timeout_secs(secs);
    }

    save(app, &config)?;
    Ok(config)
}

fn config_path(app: &AppHandle) -> Result<PathBuf, String> {
    let dir = app
        .path()
        .resolve(CONFIG_DIR, BaseDirectory::AppData)
        .map_err(|e| format!("Failed to resolve config dir: {}", e))?;
    fs::create_dir_all(&dir).map_err(|e| format!("Failed to create config dir: {}", e))?;
    Ok(dir.join(CONFIG_FILE))
}

fn save_raw(path: &PathBuf, config: &AppConfig) -> Result<(), String> {
    let json = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;
    fs::write(path, json).map_err(|e| format!("Failed to save config: {}", e))
}

fn normalize_config(config: &mut AppConfig) {
    config.hotkey = normalize_hotkey(&config.hotkey);
    config.language = normalize_language(&config.language);
    config.inactivity_timeout_secs = normalize_timeout_secs(config.inactivity_timeout_secs);
}
