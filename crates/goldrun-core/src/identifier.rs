use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const MAX_IDENTIFIER_LEN: usize = 128;

/// Placeholder names the metrics script may reference.
pub const GOLD_SCHEMA_PLACEHOLDER: &str = "GOLD_SCHEMA";
pub const SILVER_SCHEMA_PLACEHOLDER: &str = "SILVER_SCHEMA";
pub const MASTER_SCHEMA_PLACEHOLDER: &str = "MASTER_SCHEMA";

/// Unquoted SQL identifier (schema or catalog name) safe to splice into a script.
///
/// Template rendering inserts values verbatim, so every schema name passes
/// through here before it reaches a script.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        Self::parse_as(input, "identifier")
    }

    /// Parse with a label used in error messages (e.g. "schema name").
    pub fn parse_as(input: &str, kind: &'static str) -> Result<Self, ValidationError> {
        if input.is_empty() {
            return Err(ValidationError::EmptyIdentifier { kind });
        }

        let len = input.chars().count();
        if len > MAX_IDENTIFIER_LEN {
            return Err(ValidationError::IdentifierTooLong {
                kind,
                len,
                max: MAX_IDENTIFIER_LEN,
            });
        }

        if let Some(first) = input.chars().next() {
            if !(first.is_ascii_alphabetic() || first == '_') {
                return Err(ValidationError::IdentifierInvalidStart { kind, ch: first });
            }
        }

        for (index, ch) in input.chars().enumerate() {
            if !(ch.is_ascii_alphanumeric() || ch == '_') {
                return Err(ValidationError::IdentifierInvalidChar { kind, ch, index });
            }
        }

        Ok(Self(input.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Identifier {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Identifier> for String {
    fn from(value: Identifier) -> Self {
        value.0
    }
}

/// The three warehouse layers a metrics script reads and writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaLayers {
    pub gold: Identifier,
    pub silver: Identifier,
    pub master: Identifier,
}

impl SchemaLayers {
    pub fn parse(gold: &str, silver: &str, master: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            gold: Identifier::parse_as(gold, "gold schema")?,
            silver: Identifier::parse_as(silver, "silver schema")?,
            master: Identifier::parse_as(master, "master schema")?,
        })
    }

    /// Layer schemas isolated per issue (`gold_issue_<id>`), or the bare
    /// layer names when no issue is given.
    pub fn for_issue(issue_id: Option<&str>) -> Result<Self, ValidationError> {
        let layer = |name: &str| match issue_id {
            Some(issue) => format!("{name}_issue_{issue}"),
            None => name.to_string(),
        };
        Self::parse(&layer("gold"), &layer("silver"), &layer("master"))
    }

    /// Placeholder mapping for `render_template`.
    pub fn placeholders(&self) -> [(&str, &str); 3] {
        [
            (GOLD_SCHEMA_PLACEHOLDER, self.gold.as_str()),
            (SILVER_SCHEMA_PLACEHOLDER, self.silver.as_str()),
            (MASTER_SCHEMA_PLACEHOLDER, self.master.as_str()),
        ]
    }
}

/// `[catalog.]schema` reference.
pub fn qualify_schema(catalog: Option<&Identifier>, schema: &Identifier) -> String {
    match catalog {
        Some(catalog) => format!("{catalog}.{schema}"),
        None => schema.to_string(),
    }
}

/// `[catalog.]schema.table` reference.
pub fn qualify_table(catalog: Option<&Identifier>, schema: &Identifier, table: &str) -> String {
    format!("{}.{table}", qualify_schema(catalog, schema))
}
