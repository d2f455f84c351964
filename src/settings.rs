//! Layered settings
//!
//!     `defaults/lexmatch.default.toml` is embedded into the crate so that the documented
//!     defaults and runtime behavior stay in sync. Applications layer their own files and
//!     key overrides on top via [`Loader`] before deserializing into [`Settings`], which then
//!     builds the configured preprocessor and pattern search.

use crate::pattern::{PatternCompilationError, PatternOptions};
use crate::preprocessing::{
    CompilerAbstractionPreprocessor, ConfigurationError, ConfiguredPreprocessor,
    IdentityPreprocessor, Preprocessor,
};
use crate::search::PatternSearch;
use crate::token::TokenType;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/lexmatch.default.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub pattern: PatternSettings,
    pub preprocessor: PreprocessorSettings,
    pub search: SearchSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PatternSettings {
    pub size_limit: usize,
    pub dfa_size_limit: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PreprocessorKind {
    None,
    CompilerAbstraction,
    Configured,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PreprocessorSettings {
    pub kind: PreprocessorKind,
    pub prefix: String,
    /// Rule kind to values, e.g. `collapse-macro = ["FUNC", "VAR"]`.
    #[serde(default)]
    pub rules: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    #[serde(default)]
    pub ignore: Vec<TokenType>,
    pub by_class: bool,
    #[serde(default)]
    pub patterns: Vec<SearchPatternSettings>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchPatternSettings {
    pub expression: String,
    pub group: String,
}

impl PatternSettings {
    pub fn options(&self) -> PatternOptions {
        PatternOptions {
            size_limit: self.size_limit,
            dfa_size_limit: self.dfa_size_limit,
        }
    }
}

impl PreprocessorSettings {
    /// The rules as `<prefix>.<kind>.<n>` properties.
    pub fn properties(&self) -> Vec<(String, String)> {
        self.rules
            .iter()
            .flat_map(|(kind, values)| {
                values
                    .iter()
                    .enumerate()
                    .map(move |(index, value)| {
                        (format!("{}.{}.{}", self.prefix, kind, index), value.clone())
                    })
            })
            .collect()
    }

    pub fn build(&self) -> Result<Box<dyn Preprocessor>, ConfigurationError> {
        let preprocessor: Box<dyn Preprocessor> = match self.kind {
            PreprocessorKind::None => Box::new(IdentityPreprocessor),
            PreprocessorKind::CompilerAbstraction => {
                Box::new(CompilerAbstractionPreprocessor::new())
            }
            PreprocessorKind::Configured => Box::new(ConfiguredPreprocessor::from_properties(
                &self.prefix,
                self.properties(),
            )?),
        };
        Ok(preprocessor)
    }
}

impl Settings {
    /// Pattern search over `search.patterns`, compiled with the `pattern` limits.
    pub fn build_search(&self) -> Result<PatternSearch, PatternCompilationError> {
        let mut search = PatternSearch::with_options(self.pattern.options());
        for pattern in &self.search.patterns {
            if self.search.by_class {
                search.add_class_pattern(&pattern.expression, pattern.group.as_str())?;
            } else {
                search.add_type_pattern(&pattern.expression, pattern.group.as_str())?;
            }
        }
        for token_type in &self.search.ignore {
            search.ignore(*token_type);
        }
        Ok(search)
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a settings file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional settings file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<Settings, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

pub fn load_defaults() -> Result<Settings, ConfigError> {
    Loader::new().build()
}
