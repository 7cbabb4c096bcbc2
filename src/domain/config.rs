use std::path::Path;

use serde::{Deserialize, Serialize};

/// Configuration for reading and writing STMD documents.
///
/// The settings only affect export; loading a document never depends on them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// The tool name written to the root `generationTool` attribute.
    generation_tool: String,

    /// Whether export overwrites `generationDateAndTime` with the current
    /// UTC time.
    pub stamp_generation_time: bool,

    /// Spaces per nesting level in exported XML.
    ///
    /// `0` writes the document without line breaks.
    indent: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            generation_tool: default_generation_tool(),
            stamp_generation_time: true,
            indent: default_indent(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// The tool name stamped into exported documents.
    #[must_use]
    pub fn generation_tool(&self) -> &str {
        &self.generation_tool
    }

    /// Sets the tool name stamped into exported documents.
    ///
    /// Surrounding whitespace is removed; an empty name restores the default.
    pub fn set_generation_tool(&mut self, tool: &str) {
        let tool = tool.trim();
        self.generation_tool = if tool.is_empty() {
            default_generation_tool()
        } else {
            tool.to_string()
        };
    }

    /// Spaces per nesting level in exported XML.
    #[must_use]
    pub const fn indent(&self) -> usize {
        self.indent
    }

    /// Sets the indentation width of exported XML.
    pub const fn set_indent(&mut self, indent: usize) {
        self.indent = indent;
    }
}

fn default_generation_tool() -> String {
    "STMD Engine".to_string()
}

const fn default_indent() -> usize {
    2
}

const fn default_stamp() -> bool {
    true
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_generation_tool")]
        generation_tool: String,

        #[serde(default = "default_stamp")]
        stamp_generation_time: bool,

        #[serde(default = "default_indent")]
        indent: usize,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                generation_tool,
                stamp_generation_time,
                indent,
            } => {
                let mut config = Self {
                    generation_tool: String::new(),
                    stamp_generation_time,
                    indent,
                };
                config.set_generation_tool(&generation_tool);
                config
            }
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            generation_tool: config.generation_tool,
            stamp_generation_time: config.stamp_generation_time,
            indent: config.indent,
        }
    }
}
