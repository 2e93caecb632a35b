use std::fs;
use std::path::Path;

use anyhow::Context;
use regex::Regex;
use serde::Deserialize;

use crate::ngtsc::core::CompileOptions;
use crate::ngtsc::transform::src::synthesizer::SynthesisStrategy;

/// Project configuration read from `ngxc.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NgxcConfig {
    pub strategy: SynthesisStrategy,
    /// Glob patterns selecting the files compiled when none are given on the
    /// command line.
    pub include: Vec<String>,
    /// Regex a path must match to be transformed.
    pub file_pattern: String,
    pub out_dir: Option<String>,
    pub escape_dollar_in_strings: bool,
}

impl Default for NgxcConfig {
    fn default() -> Self {
        Self {
            strategy: SynthesisStrategy::default(),
            include: vec!["src/**/*.ng.tsx".to_string(), "src/**/*.component.tsx".to_string()],
            file_pattern: r"\.(component|ng)\.tsx$".to_string(),
            out_dir: None,
            escape_dollar_in_strings: true,
        }
    }
}

impl NgxcConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let config: NgxcConfig =
            serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        config.file_regex()?;
        Ok(config)
    }

    /// Loads `path` when it exists and falls back to the defaults otherwise.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            strategy: self.strategy,
            escape_dollar_in_strings: self.escape_dollar_in_strings,
        }
    }

    pub fn file_regex(&self) -> anyhow::Result<Regex> {
        Regex::new(&self.file_pattern)
            .with_context(|| format!("invalid filePattern {:?}", self.file_pattern))
    }
}
