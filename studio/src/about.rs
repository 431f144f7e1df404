//! Application identity and the fixed copy shown around the results.

use chrono::Datelike;

/// Display name used when none is configured.
pub const DEFAULT_APP_NAME: &str = "Pictor";

/// Environment variable holding the display name.
pub const APP_NAME_ENV: &str = "PICTOR_APP_NAME";

/// Shown while a generation request is outstanding.
pub const LOADING_MESSAGE: &str =
    "Kindly hold on for a moment while we bring your imaginative story to life...";

/// Application identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfo {
    pub name: String,
}

impl Default for AppInfo {
    fn default() -> Self {
        Self::new(DEFAULT_APP_NAME)
    }
}

impl AppInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Reads the display name from `PICTOR_APP_NAME`, falling back to the
    /// default name.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok()).unwrap_or_default()
    }

    /// Reads the display name through `lookup`. Returns `None` when the
    /// variable is unset or blank.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        lookup(APP_NAME_ENV)
            .filter(|name| !name.trim().is_empty())
            .map(Self::new)
    }

    /// Title of the about overlay.
    pub fn about_title(&self) -> String {
        format!("About {}", self.name)
    }

    /// Body of the about overlay.
    pub fn about_text(&self) -> String {
        format!(
            "{name} turns a few words into pictures. Type a prompt and {name} asks an \
             image generation model for four 512x512 images, or paste an image URL to \
             look at an existing picture.\n\n\
             Open any result to preview it. {name} then asks an attribution service \
             which artists the image most resembles and shows each match with its \
             percentage. Attribution is a best guess and may be missing.",
            name = self.name
        )
    }

    /// Footer line for the given year.
    pub fn footer(&self, year: i32) -> String {
        format!("\u{a9} {} {}. All rights reserved.", year, self.name)
    }

    /// Footer line for the current year.
    pub fn current_footer(&self) -> String {
        self.footer(chrono::Local::now().year())
    }
}
