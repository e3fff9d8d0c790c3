use std::path::Path;

use serde::Deserialize;

use crate::error::DiffError;
use crate::pipeline::DiffOptions;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Optional `*.toml` run configuration. Every field has a default, so an empty
/// file is valid; command-line flags override what is set here.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiffConfig {
    /// Identity column shared by both inputs.
    pub id_column: Option<String>,
    /// Treat `"0"` and `""` as equal cells.
    pub zero_matches_null: bool,
    /// Show the value of matching cells (otherwise they are blanked).
    pub show_identical: bool,
    /// Append blocks of records missing from either side.
    pub show_missing: bool,
    /// Diff matching records on the rayon thread pool.
    pub parallel: bool,
    pub csv: CsvConfig,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            id_column: None,
            zero_matches_null: true,
            show_identical: true,
            show_missing: false,
            parallel: false,
            csv: CsvConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// CSV dialect
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CsvConfig {
    pub delimiter: char,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self { delimiter: ',' }
    }
}

impl CsvConfig {
    /// Delimiter as the single byte the CSV layer expects. Only valid after
    /// [`DiffConfig::validate`].
    pub fn delimiter_byte(&self) -> u8 {
        self.delimiter as u8
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl DiffConfig {
    pub fn from_toml(input: &str) -> Result<Self, DiffError> {
        let config: DiffConfig =
            toml::from_str(input).map_err(|e| DiffError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, DiffError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| DiffError::Config(format!("{}: {e}", path.display())))?;
        log::debug!("loaded config from {}", path.display());
        Self::from_toml(&text)
    }

    pub fn validate(&self) -> Result<(), DiffError> {
        if matches!(&self.id_column, Some(col) if col.is_empty()) {
            return Err(DiffError::Config("id_column must not be empty".into()));
        }

        let d = self.csv.delimiter;
        if !d.is_ascii() || matches!(d, '"' | '\r' | '\n') {
            return Err(DiffError::Config(format!(
                "csv.delimiter must be a single ASCII character other than a quote or newline, got {d:?}"
            )));
        }

        Ok(())
    }

    /// Resolve run options. `id_column` (from the command line) wins over the
    /// configured one; one of the two must be present.
    pub fn options(&self, id_column: Option<&str>) -> Result<DiffOptions, DiffError> {
        let id_column = id_column
            .map(str::to_string)
            .or_else(|| self.id_column.clone())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| DiffError::Config("no id column given".into()))?;

        Ok(DiffOptions {
            id_column,
            zero_matches_null: self.zero_matches_null,
            show_identical: self.show_identical,
            show_missing: self.show_missing,
            parallel: self.parallel,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = DiffConfig::from_toml("").unwrap();
        assert!(config.id_column.is_none());
        assert!(config.zero_matches_null);
        assert!(config.show_identical);
        assert!(!config.show_missing);
        assert!(!config.parallel);
        assert_eq!(config.csv.delimiter, ',');
    }

    #[test]
    fn parse_full() {
        let config = DiffConfig::from_toml(
            r#"
id_column = "sku"
zero_matches_null = false
show_identical = false
show_missing = true
parallel = true

[csv]
delimiter = ";"
"#,
        )
        .unwrap();
        assert_eq!(config.id_column.as_deref(), Some("sku"));
        assert!(!config.zero_matches_null);
        assert!(!config.show_identical);
        assert!(config.show_missing);
        assert!(config.parallel);
        assert_eq!(config.csv.delimiter_byte(), b';');
    }

    #[test]
    fn unknown_key_rejected() {
        let err = DiffConfig::from_toml("show_mising = true").unwrap_err();
        assert!(matches!(err, DiffError::Config(_)));
    }

    #[test]
    fn bad_delimiter_rejected() {
        for bad in ["\"\\\"\"", "\"\\n\"", "\"é\""] {
            let input = format!("[csv]\ndelimiter = {bad}");
            let err = DiffConfig::from_toml(&input).unwrap_err();
            assert!(err.to_string().contains("csv.delimiter"), "{input}: {err}");
        }
    }

    #[test]
    fn empty_id_column_rejected() {
        let err = DiffConfig::from_toml("id_column = \"\"").unwrap_err();
        assert!(err.to_string().contains("id_column"));
    }

    #[test]
    fn options_prefer_command_line_id() {
        let config = DiffConfig::from_toml("id_column = \"a\"").unwrap();
        assert_eq!(config.options(None).unwrap().id_column, "a");
        assert_eq!(config.options(Some("b")).unwrap().id_column, "b");

        let err = DiffConfig::default().options(None).unwrap_err();
        assert!(matches!(err, DiffError::Config(_)));
    }

    #[test]
    fn from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.toml");
        std::fs::write(&path, "id_column = \"id\"\nshow_missing = true\n").unwrap();
        let config = DiffConfig::from_path(&path).unwrap();
        assert_eq!(config.id_column.as_deref(), Some("id"));
        assert!(config.show_missing);

        let err = DiffConfig::from_path(&dir.path().join("nope.toml")).unwrap_err();
        assert!(err.to_string().contains("nope.toml"));
    }
}
