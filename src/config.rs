//! Application configuration.
//!
//! Built once per invocation from layers, later layers winning:
//!
//! 1. built-in defaults
//! 2. a YAML file (`--config`, else `SHEETCHECK_CONFIG`, else `./sheetcheck.yaml` if present)
//! 3. `SHEETCHECK_*` environment variables (a `.env` file is loaded first)
//! 4. command-line flags
//!
//! The result is validated and never changes afterwards.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::ports::FileSystem;
use crate::validate::{SheetKind, SourceSheet};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "SHEETCHECK_CONFIG";
/// Config file picked up from the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "sheetcheck.yaml";

/// Configuration failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {}: {message}", path.display())]
    Read {
        /// Config file location.
        path: PathBuf,
        /// Underlying error text.
        message: String,
    },

    /// The config file is not valid YAML for this schema.
    #[error("invalid config file {}: {source}", path.display())]
    Parse {
        /// Config file location.
        path: PathBuf,
        /// YAML error.
        source: serde_yaml::Error,
    },

    /// A setting was left empty.
    #[error("setting `{0}` must not be empty")]
    Empty(&'static str),

    /// Two settings name the same sheet.
    #[error("sheet name {0:?} is used more than once")]
    DuplicateSheet(String),
}

/// Validated settings for one run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Directory holding the workbook's sheet files.
    pub workbook_dir: PathBuf,
    /// Spreadsheet document id used in cell links; empty for sheet-local links.
    pub spreadsheet_id: String,
    /// Sales journal sheet.
    pub sales_sheet: String,
    /// Training schedule sheet.
    pub trainings_sheet: String,
    /// Leads sheet.
    pub leads_sheet: String,
    /// Report sheet holding the task list.
    pub report_sheet: String,
    /// Required columns of the sales sheet.
    pub sales_columns: Vec<String>,
    /// Required columns of the trainings sheet.
    pub trainings_columns: Vec<String>,
    /// Required columns of the leads sheet.
    pub leads_columns: Vec<String>,
    /// Default log filter when `SHEETCHECK_LOG` is unset.
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workbook_dir: PathBuf::from("workbook"),
            spreadsheet_id: String::new(),
            sales_sheet: "Sales".to_string(),
            trainings_sheet: "Trainings".to_string(),
            leads_sheet: "Leads".to_string(),
            report_sheet: "Tasks".to_string(),
            sales_columns: SheetKind::Sales.default_columns(),
            trainings_columns: SheetKind::Trainings.default_columns(),
            leads_columns: SheetKind::Leads.default_columns(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Resolves every layer except command-line flags and validates the result.
    ///
    /// `lookup` reads environment variables; pass [`env_lookup`] in production.
    ///
    /// # Errors
    ///
    /// Returns an error if a named config file is missing or invalid, or the
    /// merged settings fail validation.
    pub fn load(
        fs: &dyn FileSystem,
        explicit: Option<&Path>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let named = explicit.map(Path::to_path_buf).or_else(|| lookup(CONFIG_ENV).map(PathBuf::from));
        let base = match named {
            Some(path) => Self::from_yaml_file(fs, &path)?,
            None if fs.exists(Path::new(DEFAULT_CONFIG_FILE)) => {
                Self::from_yaml_file(fs, Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        let config = base.with_env(lookup);
        config.validate()?;
        Ok(config)
    }

    /// Parses a YAML file; settings it omits keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_yaml_file(fs: &dyn FileSystem, path: &Path) -> Result<Self, ConfigError> {
        let contents = fs
            .read_to_string(path)
            .map_err(|e| ConfigError::Read { path: path.to_path_buf(), message: e.to_string() })?;
        Self::from_yaml(&contents)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    /// Parses YAML text on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns the YAML error for malformed input or unknown keys.
    pub fn from_yaml(contents: &str) -> Result<Self, serde_yaml::Error> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(contents)
    }

    /// Applies `SHEETCHECK_*` overrides read through `lookup`.
    #[must_use]
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = lookup("SHEETCHECK_WORKBOOK") {
            self.workbook_dir = PathBuf::from(dir);
        }
        let strings = [
            ("SHEETCHECK_SPREADSHEET_ID", &mut self.spreadsheet_id),
            ("SHEETCHECK_SALES_SHEET", &mut self.sales_sheet),
            ("SHEETCHECK_TRAININGS_SHEET", &mut self.trainings_sheet),
            ("SHEETCHECK_LEADS_SHEET", &mut self.leads_sheet),
            ("SHEETCHECK_REPORT_SHEET", &mut self.report_sheet),
            ("SHEETCHECK_LOG_LEVEL", &mut self.log_level),
        ];
        for (key, slot) in strings {
            if let Some(value) = lookup(key) {
                *slot = value.trim().to_string();
            }
        }
        let lists = [
            ("SHEETCHECK_SALES_COLUMNS", &mut self.sales_columns),
            ("SHEETCHECK_TRAININGS_COLUMNS", &mut self.trainings_columns),
            ("SHEETCHECK_LEADS_COLUMNS", &mut self.leads_columns),
        ];
        for (key, slot) in lists {
            if let Some(value) = lookup(key) {
                *slot = split_columns(&value);
            }
        }
        self
    }

    /// Replaces the workbook directory when a flag supplies one.
    #[must_use]
    pub fn with_workbook(mut self, dir: Option<&Path>) -> Self {
        if let Some(dir) = dir {
            self.workbook_dir = dir.to_path_buf();
        }
        self
    }

    /// Checks that names and column lists are usable.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty setting or a sheet named twice.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workbook_dir.as_os_str().is_empty() {
            return Err(ConfigError::Empty("workbook_dir"));
        }
        let sheets = [
            ("sales_sheet", &self.sales_sheet),
            ("trainings_sheet", &self.trainings_sheet),
            ("leads_sheet", &self.leads_sheet),
            ("report_sheet", &self.report_sheet),
        ];
        let mut seen = HashSet::new();
        for (setting, name) in sheets {
            if name.trim().is_empty() {
                return Err(ConfigError::Empty(setting));
            }
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::DuplicateSheet(name.clone()));
            }
        }
        let lists = [
            ("sales_columns", &self.sales_columns),
            ("trainings_columns", &self.trainings_columns),
            ("leads_columns", &self.leads_columns),
        ];
        for (setting, columns) in lists {
            if columns.iter().all(|c| c.trim().is_empty()) {
                return Err(ConfigError::Empty(setting));
            }
        }
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::Empty("log_level"));
        }
        Ok(())
    }

    /// The source sheets to validate, in processing order.
    #[must_use]
    pub fn source_sheets(&self) -> Vec<SourceSheet> {
        [
            (SheetKind::Sales, &self.sales_sheet, &self.sales_columns),
            (SheetKind::Trainings, &self.trainings_sheet, &self.trainings_columns),
            (SheetKind::Leads, &self.leads_sheet, &self.leads_columns),
        ]
        .into_iter()
        .map(|(kind, name, columns)| SourceSheet {
            kind,
            name: name.clone(),
            required_columns: columns.clone(),
        })
        .collect()
    }
}

/// Reads a process environment variable; unset and non-UTF-8 values are `None`.
#[must_use]
pub fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn split_columns(value: &str) -> Vec<String> {
    value.split(',').map(str::trim).filter(|c| !c.is_empty()).map(String::from).collect()
}
