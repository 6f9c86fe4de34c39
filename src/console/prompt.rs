//! Prompt rendering
//!
//! The prompt reads `<user>@<device>:<path> $ `, where user and device are
//! cut at their first space.

use serde::{Deserialize, Serialize};

/// Identity shown in the prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user: String,
    pub device: String,
    pub path: String,
}

impl Default for Identity {
    fn default() -> Self {
        Self {
            user: "user".to_string(),
            device: "local".to_string(),
            path: "/".to_string(),
        }
    }
}

impl Identity {
    pub fn new(user: impl Into<String>, device: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            device: device.into(),
            path: path.into(),
        }
    }

    /// The prompt for the local user
    pub fn prompt(&self) -> String {
        render_prompt(&self.user, &self.device, &self.path)
    }

    /// The prompt for a message sent by someone else
    pub fn sender_prompt(&self, sender: &str, path: &str) -> String {
        render_prompt(sender, &self.device, path)
    }
}

fn first_word(s: &str) -> &str {
    s.split(' ').next().unwrap_or("")
}

/// Render a prompt string
pub fn render_prompt(user: &str, device: &str, path: &str) -> String {
    format!("{}@{}:{} $ ", first_word(user), first_word(device), path)
}
