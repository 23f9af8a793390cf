//! Optional debugger defaults from `config.toml` in the user's config
//! directory. A missing file means library defaults; a malformed file
//! logs a warning and falls back, it never aborts the run.

use serde::Deserialize;
use std::path::PathBuf;

use synvm_core::debug::{Debugger, View};

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub debugger: DebuggerConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct DebuggerConfig {
    pub disass_lines: Option<u16>,
    pub show_history: Option<bool>,
    pub show_stack: Option<bool>,
    pub show_regs: Option<bool>,
    pub show_disass: Option<bool>,
    pub show_memory: Option<bool>,
}

impl Config {
    pub fn load() -> Self {
        let Some(path) = config_path() else {
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(text) => Self::parse(&text).unwrap_or_else(|e| {
                log::warn!("ignoring malformed {}: {e}", path.display());
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn apply(&self, debugger: &mut Debugger) {
        let d = &self.debugger;
        if let Some(lines) = d.disass_lines {
            debugger.set_disass_lines(lines);
        }
        for (view, value) in [
            (View::History, d.show_history),
            (View::Stack, d.show_stack),
            (View::Regs, d.show_regs),
            (View::Disass, d.show_disass),
            (View::Memory, d.show_memory),
        ] {
            if let Some(on) = value {
                debugger.set_view_enabled(view, on);
            }
        }
    }
}

fn config_path() -> Option<PathBuf> {
    Some(dirs::config_dir()?.join("synvm").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_parses_to_defaults() {
        let config = Config::parse("").unwrap();
        assert!(config.debugger.disass_lines.is_none());
        assert!(config.debugger.show_memory.is_none());
    }

    #[test]
    fn debugger_section_parses() {
        let config = Config::parse(
            "[debugger]\ndisass_lines = 32\nshow_memory = true\nshow_history = false\n",
        )
        .unwrap();
        assert_eq!(config.debugger.disass_lines, Some(32));
        assert_eq!(config.debugger.show_memory, Some(true));
        assert_eq!(config.debugger.show_history, Some(false));
        assert!(config.debugger.show_regs.is_none());
    }

    #[test]
    fn malformed_config_is_an_error() {
        assert!(Config::parse("[debugger\nnope").is_err());
    }
}
