//! Feature schema: the ordered column names a model was trained on

use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::info;

/// Ordered, immutable list of feature-column names.
///
/// Defines both the length of every feature vector and the position of
/// each column in it.
#[derive(Debug, Clone)]
pub struct FeatureSchema {
    columns: Vec<String>,
    positions: HashMap<String, usize>,
}

impl FeatureSchema {
    /// Build a schema from column names in training order.
    ///
    /// Empty schemas and duplicate names are rejected.
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        if columns.is_empty() {
            bail!("Feature schema has no columns");
        }

        let mut positions = HashMap::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            if positions.insert(name.clone(), i).is_some() {
                bail!("Duplicate feature column '{}'", name);
            }
        }

        Ok(Self { columns, positions })
    }

    /// Load a schema artifact.
    ///
    /// Accepts a JSON array of strings, or plain text with one column name
    /// per line.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            bail!("Column file not found: {}", path.display());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read column file {}", path.display()))?;

        let columns: Vec<String> = if raw.trim_start().starts_with('[') {
            serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse column list {}", path.display()))?
        } else {
            raw.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect()
        };

        let schema = Self::from_columns(columns)
            .with_context(|| format!("Invalid column list {}", path.display()))?;

        info!(
            path = %path.display(),
            columns = schema.len(),
            "Feature schema loaded"
        );

        Ok(schema)
    }

    /// Column names in stored order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Column names in stored order, for display
    pub fn list_columns(&self) -> Vec<&str> {
        self.columns.iter().map(String::as_str).collect()
    }

    /// Print the column listing: a header with the count, one name per
    /// line in stored order, then a closing rule.
    pub fn write_listing<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "--- MODEL FEATURE COLUMNS ({}) ---", self.len())?;
        for column in self.list_columns() {
            writeln!(writer, "{}", column)?;
        }
        writeln!(writer, "-----------------------------------")
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.positions.get(column).copied()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.positions.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_columns() {
        let schema = FeatureSchema::from_columns(["Year", "KM's driven", "make_toyota"]).unwrap();

        assert_eq!(schema.len(), 3);
        assert_eq!(schema.position("make_toyota"), Some(2));
        assert!(schema.contains("KM's driven"));
        assert!(!schema.contains("make_tesla"));
        assert_eq!(schema.list_columns(), vec!["Year", "KM's driven", "make_toyota"]);
    }

    #[test]
    fn test_write_listing() {
        let schema = FeatureSchema::from_columns(["Year", "KM's driven", "make_toyota"]).unwrap();
        let mut out = Vec::new();
        schema.write_listing(&mut out).unwrap();

        let out = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines,
            vec![
                "--- MODEL FEATURE COLUMNS (3) ---",
                "Year",
                "KM's driven",
                "make_toyota",
                "-----------------------------------",
            ]
        );
    }

    #[test]
    fn test_rejects_empty_and_duplicates() {
        assert!(FeatureSchema::from_columns(Vec::<String>::new()).is_err());
        assert!(FeatureSchema::from_columns(["Year", "Year"]).is_err());
    }

    #[test]
    fn test_load_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"["Year", "KM's driven", "fuel_diesel"]"#).unwrap();

        let schema = FeatureSchema::load(file.path()).unwrap();
        assert_eq!(schema.columns()[2], "fuel_diesel");
    }

    #[test]
    fn test_load_plain_text() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Year\nKM's driven\n\nmake_honda\n").unwrap();

        let schema = FeatureSchema::load(file.path()).unwrap();
        assert_eq!(schema.list_columns(), vec!["Year", "KM's driven", "make_honda"]);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = FeatureSchema::load(dir.path().join("columns.json")).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
