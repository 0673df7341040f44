//! Parser for the INI-style `.edgerc` credentials file.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{ConfigError, ConfigResult};

/// Key/value pairs of one `[section]`, keys lowercased.
pub type Section = BTreeMap<String, String>;

/// Parsed credentials file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Edgerc {
    sections: BTreeMap<String, Section>,
}

impl Edgerc {
    /// Read and parse the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains a malformed line.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents, path)
    }

    /// Parse file contents; `origin` is only used in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Malformed`] for a key outside any section, an
    /// unterminated section header, or a line that is neither.
    pub fn parse(contents: &str, origin: &Path) -> ConfigResult<Self> {
        let malformed = |line: usize, reason: &'static str| ConfigError::Malformed {
            path: origin.to_path_buf(),
            line,
            reason,
        };

        let mut sections: BTreeMap<String, Section> = BTreeMap::new();
        let mut current: Option<String> = None;

        for (index, raw) in contents.lines().enumerate() {
            let line_no = index + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(header) = line.strip_prefix('[') {
                let name = header
                    .strip_suffix(']')
                    .ok_or_else(|| malformed(line_no, "section header is missing ']'"))?
                    .trim()
                    .to_string();
                sections.entry(name.clone()).or_default();
                current = Some(name);
                continue;
            }

            let Some(section) = current.as_ref() else {
                return Err(malformed(line_no, "key appears before any [section] header"));
            };
            let split_at = line
                .find(['=', ':'])
                .ok_or_else(|| malformed(line_no, "expected `key = value`"))?;
            let (key, value) = line.split_at(split_at);
            let key = key.trim().to_ascii_lowercase();
            if key.is_empty() {
                return Err(malformed(line_no, "empty key"));
            }
            let value = value[1..].trim().to_string();
            sections.entry(section.clone()).or_default().insert(key, value);
        }

        Ok(Self { sections })
    }

    /// Look up a section by exact name.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }
}
