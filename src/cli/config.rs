//! Console Configuration and Theme Management
//!
//! Settings are layered: built-in defaults, then an optional JSON file, then
//! environment overrides. The result is validated before the console starts.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::console::prompt::Identity;
use crate::console::session::IncomingMessage;
use crate::error::ConfigError;

/// Environment variable naming the configuration file
pub const CONFIG_ENV: &str = "CELLSHELL_CONFIG";
/// Configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "cellshell.json";

const USER_ENV: &str = "CELLSHELL_USER";
const DEVICE_ENV: &str = "CELLSHELL_DEVICE";
const PATH_ENV: &str = "CELLSHELL_PATH";

/// Configuration for the console front end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub user: String,
    pub device: String,
    pub path: String,
    pub theme_name: String,
    pub prompt_color: String,
    pub text_color: String,
    pub output_color: String,
    /// Delivered as an incoming message from `system` at start-up
    pub welcome_message: Option<String>,
    /// Where tracing output goes; no logging without it
    pub log_file: Option<PathBuf>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        let identity = Identity::default();
        Self {
            user: identity.user,
            device: identity.device,
            path: identity.path,
            theme_name: "default".to_string(),
            prompt_color: "Blue".to_string(),
            text_color: "White".to_string(),
            output_color: "Gray".to_string(),
            welcome_message: None,
            log_file: None,
        }
    }
}

impl ConsoleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from the process environment
    ///
    /// The file named by `CELLSHELL_CONFIG` must exist; `cellshell.json` in
    /// the working directory is only used when present.
    pub fn load() -> Result<Self, ConfigError> {
        let path = match env::var_os(CONFIG_ENV) {
            Some(path) => Some(PathBuf::from(path)),
            None => {
                let local = PathBuf::from(DEFAULT_CONFIG_FILE);
                local.is_file().then_some(local)
            }
        };

        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON configuration file; missing fields take their defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let parse_error = |source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        };
        let raw: Value = serde_json::from_str(&content).map_err(parse_error)?;
        let mut config: Self = serde_json::from_value(raw.clone()).map_err(parse_error)?;

        // A theme supplies every colour the file leaves out
        if let Some(theme) = raw.get("theme_name").and_then(Value::as_str) {
            let mut themed = config.clone();
            themed.apply_theme(theme);
            if raw.get("prompt_color").is_none() {
                config.prompt_color = themed.prompt_color;
            }
            if raw.get("text_color").is_none() {
                config.text_color = themed.text_color;
            }
            if raw.get("output_color").is_none() {
                config.output_color = themed.output_color;
            }
        }
        info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Apply identity overrides from `lookup` (normally the environment)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for (key, field) in [
            (USER_ENV, &mut self.user),
            (DEVICE_ENV, &mut self.device),
            (PATH_ENV, &mut self.path),
        ] {
            if let Some(value) = lookup(key) {
                debug!(key, value = %value, "environment override");
                *field = value;
            }
        }
    }

    /// Reject values the prompt cannot be built from
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.user.trim().is_empty() {
            return Err(invalid("user", "must not be empty"));
        }
        if self.device.trim().is_empty() {
            return Err(invalid("device", "must not be empty"));
        }
        if !self.path.starts_with('/') {
            return Err(invalid("path", "must start with '/'"));
        }
        Ok(())
    }

    /// The identity shown in prompts
    pub fn identity(&self) -> Identity {
        Identity::new(self.user.clone(), self.device.clone(), self.path.clone())
    }

    /// The welcome message as an incoming message from `system`
    pub fn welcome(&self) -> Option<IncomingMessage> {
        self.welcome_message
            .as_ref()
            .map(|message| IncomingMessage::new(message.clone(), "system", "/"))
    }

    /// Apply a theme by name; unknown names fall back to the default theme
    pub fn apply_theme(&mut self, theme_name: &str) {
        let (prompt, text, output) = match theme_name {
            "dark" => ("Green", "Gray", "DarkGray"),
            "light" => ("Blue", "Black", "DarkGray"),
            "ocean" => ("Cyan", "White", "LightBlue"),
            "sunset" => ("Magenta", "Yellow", "LightRed"),
            _ => ("Blue", "White", "Gray"),
        };
        self.prompt_color = prompt.to_string();
        self.text_color = text.to_string();
        self.output_color = output.to_string();
        self.theme_name = theme_name.to_string();
    }

    pub fn get_prompt_color(&self) -> Color {
        parse_color(&self.prompt_color).unwrap_or(Color::Blue)
    }

    pub fn get_text_color(&self) -> Color {
        parse_color(&self.text_color).unwrap_or(Color::White)
    }

    pub fn get_output_color(&self) -> Color {
        parse_color(&self.output_color).unwrap_or(Color::Gray)
    }

    /// Get available themes
    pub fn get_available_themes() -> Vec<String> {
        vec![
            "default - Blue prompt, white text".to_string(),
            "dark - Green prompt, gray text".to_string(),
            "light - Blue prompt, black text".to_string(),
            "ocean - Cyan prompt, white text".to_string(),
            "sunset - Magenta prompt, yellow text".to_string(),
        ]
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::Invalid {
        field: field.to_string(),
        message: message.to_string(),
    }
}

/// Map a colour name to a terminal colour
pub fn parse_color(name: &str) -> Option<Color> {
    let color = match name.to_ascii_lowercase().as_str() {
        "black" => Color::Black,
        "white" => Color::White,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" | "darkblue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "gray" | "grey" => Color::Gray,
        "darkgray" | "darkgrey" => Color::DarkGray,
        "lightred" => Color::LightRed,
        "lightgreen" => Color::LightGreen,
        "lightyellow" => Color::LightYellow,
        "lightblue" => Color::LightBlue,
        "lightmagenta" => Color::LightMagenta,
        "lightcyan" => Color::LightCyan,
        _ => return None,
    };
    Some(color)
}
