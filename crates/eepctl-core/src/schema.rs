//! EEPROM layout schema
//!
//! A schema document names one or more layouts. Each layout declares a base
//! offset, the erasable block and the string fields stored in the image:
//!
//! ```json
//! {
//!   "SysEeprom": {
//!     "base_offset": 0,
//!     "block":  { "descr": "System info", "value": null, "offset": 0, "size": 128 },
//!     "fields": {
//!       "serial": { "descr": "Serial Number", "value": "SN0000", "offset": 0, "size": 15 },
//!       "model":  { "descr": "Model Name", "value": null, "offset": "0x10", "size": 31 }
//!     }
//!   }
//! }
//! ```
//!
//! The same shape is accepted in TOML. Offsets and sizes may be integers or
//! hex (`"0x10"`) / decimal strings. Field ranges are not checked against
//! the image size or against each other.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Layout picked when a document holds several and none is requested
pub const DEFAULT_LAYOUT: &str = "SysEeprom";

/// A named string field within the image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Human readable label
    #[serde(rename = "descr", default)]
    pub description: String,
    /// Value written by `init`, if any
    #[serde(rename = "value", default)]
    pub default_value: Option<String>,
    /// Offset relative to the schema base offset
    #[serde(deserialize_with = "deserialize_hex_u32")]
    pub offset: u32,
    /// Payload capacity in bytes, not counting the terminator
    #[serde(deserialize_with = "deserialize_hex_u32")]
    pub size: u32,
}

/// The region cleared by a block erase; same shape as a field
pub type BlockDescriptor = FieldDescriptor;

/// Field layout of one EEPROM
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Added to every field and block offset
    #[serde(default, deserialize_with = "deserialize_hex_u32")]
    pub base_offset: u32,
    /// Fields by name
    pub fields: BTreeMap<String, FieldDescriptor>,
    /// Erasable region
    pub block: BlockDescriptor,
}

impl Schema {
    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(name)
    }

    /// Field names in sorted order
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    /// Fields ordered by ascending offset, ties broken by name
    pub fn fields_by_offset(&self) -> Vec<(&str, &FieldDescriptor)> {
        let mut fields: Vec<_> = self
            .fields
            .iter()
            .map(|(name, field)| (name.as_str(), field))
            .collect();
        fields.sort_by_key(|(_, field)| field.offset);
        fields
    }

    /// Render as pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A schema file: layout name to layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaDocument {
    /// Layouts by name
    pub layouts: BTreeMap<String, Schema>,
}

impl SchemaDocument {
    /// Load a schema file, picking the format from its extension
    ///
    /// `.toml` files are parsed as TOML, everything else as JSON.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        let doc = if is_toml {
            Self::from_toml_str(&content)?
        } else {
            Self::from_json_str(&content)?
        };

        log::debug!(
            "Loaded {} layout(s) from {}",
            doc.layouts.len(),
            path.display()
        );
        Ok(doc)
    }

    /// Parse a JSON schema document
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Parse a TOML schema document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Layout names in sorted order
    pub fn layout_names(&self) -> Vec<String> {
        self.layouts.keys().cloned().collect()
    }

    /// Take one layout out of the document
    ///
    /// Without a name, a document holding a single layout yields that
    /// layout; otherwise [`DEFAULT_LAYOUT`] is tried.
    pub fn select(mut self, name: Option<&str>) -> Result<Schema> {
        if let Some(name) = name {
            let available = self.layout_names();
            return self.layouts.remove(name).ok_or(Error::LayoutNotFound {
                name: name.to_string(),
                available,
            });
        }

        if self.layouts.len() == 1 {
            if let Some((name, schema)) = self.layouts.pop_first() {
                log::debug!("Using layout '{}'", name);
                return Ok(schema);
            }
        }

        let available = self.layout_names();
        self.layouts
            .remove(DEFAULT_LAYOUT)
            .ok_or(Error::AmbiguousLayout { available })
    }
}

/// Deserialize a u32 that can be hex (0x...) or decimal
fn deserialize_hex_u32<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum HexOrInt {
        Int(u32),
        Str(String),
    }

    match HexOrInt::deserialize(deserializer)? {
        HexOrInt::Int(n) => Ok(n),
        HexOrInt::Str(s) => parse_number(&s).map_err(serde::de::Error::custom),
    }
}

/// Parse a number that can be hex (0x...) or decimal
fn parse_number(s: &str) -> std::result::Result<u32, String> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).map_err(|e| format!("invalid hex: {}", e))
    } else {
        s.parse().map_err(|e| format!("invalid number: {}", e))
    }
}
