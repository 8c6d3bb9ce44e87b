use crate::error::LoadError;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Catalog bucket a statement belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Bulk-load from object storage into staging tables
    Stage,
    /// Transform staged rows into analytics tables
    Insert,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Stage => "stage",
            Phase::Insert => "insert",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named SQL statement. The text is opaque to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementTemplate {
    name: String,
    sql: String,
}

impl StatementTemplate {
    pub fn new(name: impl Into<String>, sql: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql: sql.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Resolve `{placeholder}` markers against `params`.
    ///
    /// Only brace pairs enclosing a lowercase identifier are treated as
    /// placeholders; any other brace text is copied through unchanged.
    pub fn render(&self, params: &HashMap<String, String>) -> Result<Self, LoadError> {
        let mut rendered = String::with_capacity(self.sql.len());
        let mut rest = self.sql.as_str();

        while let Some(open) = rest.find('{') {
            rendered.push_str(&rest[..open]);
            let after = &rest[open + 1..];

            let key = after
                .find('}')
                .map(|close| &after[..close])
                .filter(|key| is_placeholder(key));

            match key {
                Some(key) => {
                    let value = params.get(key).ok_or_else(|| {
                        LoadError::Template(format!(
                            "Statement '{}' references unknown parameter '{{{}}}'",
                            self.name, key
                        ))
                    })?;
                    rendered.push_str(value);
                    rest = &after[key.len() + 1..];
                }
                None => {
                    rendered.push('{');
                    rest = after;
                }
            }
        }
        rendered.push_str(rest);

        Ok(Self {
            name: self.name.clone(),
            sql: rendered,
        })
    }
}

fn is_placeholder(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}
