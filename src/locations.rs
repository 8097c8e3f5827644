use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result, bail};

/// Sentinel city name for location indices absent from the lookup.
pub const UNKNOWN_CITY: &str = "Unknown";

/// Location index -> city name lookup, loaded once from the reference
/// CSV and never mutated during a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationTable {
    names: HashMap<usize, String>,
}

impl LocationTable {
    /// A missing lookup file is a precondition failure, not a
    /// recoverable error.
    pub fn from_csv(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!("locations file not found: {}", path.display());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let mut lines = content.lines();
        let header = lines.next().context("locations file is empty")?;
        let columns = split_csv_line(header);
        let city_col = columns
            .iter()
            .position(|c| c == "city_name")
            .context("locations file missing city_name column")?;

        let mut names = HashMap::new();
        for (lineno, line) in lines.enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let fields = split_csv_line(line);
            // The row index (first column) is the join key; the file's
            // own location_id column is informational.
            let index: usize = fields
                .first()
                .map(|s| s.trim())
                .unwrap_or("")
                .parse()
                .with_context(|| format!("invalid location index on line {}", lineno + 2))?;
            let city = fields
                .get(city_col)
                .with_context(|| format!("missing city_name on line {}", lineno + 2))?;
            names.insert(index, city.clone());
        }
        Ok(Self { names })
    }

    pub fn name(&self, index: usize) -> &str {
        self.names
            .get(&index)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_CITY)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Entries in ascending index order.
    pub fn sorted_entries(&self) -> Vec<(usize, &str)> {
        let mut entries: Vec<(usize, &str)> = self
            .names
            .iter()
            .map(|(&index, name)| (index, name.as_str()))
            .collect();
        entries.sort_by_key(|entry| entry.0);
        entries
    }
}

/// Per-run lookup cache. A repeat invocation on the same context reuses
/// the loaded table; `invalidate` forces a re-read.
#[derive(Debug, Default)]
pub struct LocationCache {
    table: Option<LocationTable>,
}

impl LocationCache {
    pub fn get_or_load(&mut self, path: &Path) -> Result<&LocationTable> {
        if self.table.is_none() {
            self.table = Some(LocationTable::from_csv(path)?);
        }
        self.table.as_ref().context("location cache empty after load")
    }

    pub fn is_loaded(&self) -> bool {
        self.table.is_some()
    }

    pub fn invalidate(&mut self) {
        self.table = None;
    }
}

/// Minimal quote-aware CSV field splitter.
pub(crate) fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}
