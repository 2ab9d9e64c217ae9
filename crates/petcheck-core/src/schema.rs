//! Response contracts for pet, order and inventory bodies
//!
//! Each contract is a JSON Schema document compiled with `jsonschema`. Besides
//! the whole-document validator, every top-level property gets its own
//! validator so a violation can be pinned to the field that caused it.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::config::Config;

/// Named response shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaName {
    Pet,
    #[serde(alias = "store")]
    Order,
    Inventory,
}

impl SchemaName {
    pub const ALL: [Self; 3] = [Self::Pet, Self::Order, Self::Inventory];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pet => "pet",
            Self::Order => "order",
            Self::Inventory => "inventory",
        }
    }
}

impl fmt::Display for SchemaName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SchemaName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pet" => Ok(Self::Pet),
            "order" | "store" => Ok(Self::Order),
            "inventory" => Ok(Self::Inventory),
            other => Err(format!("unknown schema '{other}'")),
        }
    }
}

/// Which status labels the inventory contract requires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InventoryVariant {
    /// `approved` and `delivered`
    #[default]
    Core,
    /// `approved`, `delivered` and `placed`
    WithPlaced,
}

impl InventoryVariant {
    #[must_use]
    pub const fn labels(self) -> &'static [&'static str] {
        match self {
            Self::Core => &["approved", "delivered"],
            Self::WithPlaced => &["approved", "delivered", "placed"],
        }
    }
}

/// Built-in JSON Schema document for `name`.
#[must_use]
pub fn contract(name: SchemaName, variant: InventoryVariant) -> Value {
    match name {
        SchemaName::Pet => json!({
            "type": "object",
            "properties": {
                "id": {"type": "integer"},
                "name": {"type": "string"},
                "category": {
                    "type": "object",
                    "properties": {
                        "id": {"type": "integer"},
                        "name": {"type": "string"}
                    }
                },
                "photoUrls": {
                    "type": "array",
                    "items": {"type": "string"}
                },
                "tags": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "id": {"type": "integer"},
                            "name": {"type": "string"}
                        }
                    }
                },
                "status": {
                    "type": "string",
                    "enum": ["available", "pending", "sold"]
                }
            },
            "required": ["id", "name", "status"]
        }),
        SchemaName::Order => json!({
            "type": "object",
            "properties": {
                "id": {"type": "integer"},
                "petId": {"type": "integer"},
                "quantity": {"type": "integer"},
                "shipDate": {"type": "string"},
                "status": {
                    "type": "string",
                    "enum": ["placed", "approved", "delivered"]
                },
                "complete": {"type": "boolean"}
            },
            "required": ["id", "petId", "quantity", "shipDate", "status", "complete"]
        }),
        SchemaName::Inventory => {
            let labels = variant.labels();
            let properties: serde_json::Map<String, Value> = labels
                .iter()
                .map(|l| ((*l).to_string(), json!({"type": "integer"})))
                .collect();
            json!({
                "type": "object",
                "properties": properties,
                "required": labels,
                "additionalProperties": false
            })
        }
    }
}

/// Why a body failed its contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{schema} schema violation{}: {}", at_field(.field), .messages.join("; "))]
pub struct SchemaError {
    pub schema: SchemaName,
    /// Top-level field that is missing, mistyped or unexpected
    pub field: Option<String>,
    /// Validator messages (at most five)
    pub messages: Vec<String>,
}

fn at_field(field: &Option<String>) -> String {
    field
        .as_deref()
        .map(|f| format!(" at `{f}`"))
        .unwrap_or_default()
}

#[derive(Debug, thiserror::Error)]
pub enum SchemaLoadError {
    #[error("Cannot read {0}: {1}")]
    Io(PathBuf, String),
    #[error("Invalid document {0}: {1}")]
    Parse(PathBuf, String),
    #[error("Invalid {0} schema: {1}")]
    Compile(SchemaName, String),
}

/// A contract compiled for validation.
struct Compiled {
    document: Value,
    validator: jsonschema::Validator,
    required: Vec<String>,
    properties: Vec<(String, jsonschema::Validator)>,
    closed: bool,
}

impl Compiled {
    fn new(name: SchemaName, document: Value) -> Result<Self, SchemaLoadError> {
        let validator = jsonschema::validator_for(&document)
            .map_err(|e| SchemaLoadError::Compile(name, e.to_string()))?;

        let required = document
            .get("required")
            .and_then(Value::as_array)
            .map(|r| {
                r.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let mut properties = Vec::new();
        if let Some(props) = document.get("properties").and_then(Value::as_object) {
            for (field, sub) in props {
                let v = jsonschema::validator_for(sub)
                    .map_err(|e| SchemaLoadError::Compile(name, format!("{field}: {e}")))?;
                properties.push((field.clone(), v));
            }
        }

        let closed = document.get("additionalProperties") == Some(&Value::Bool(false));

        Ok(Self {
            document,
            validator,
            required,
            properties,
            closed,
        })
    }

    /// First top-level field responsible for a violation, if any.
    fn offending_field(&self, body: &Value) -> Option<String> {
        let obj = body.as_object()?;
        if let Some(missing) = self.required.iter().find(|f| !obj.contains_key(*f)) {
            return Some(missing.clone());
        }
        for (field, v) in &self.properties {
            if let Some(value) = obj.get(field) {
                if !v.is_valid(value) {
                    return Some(field.clone());
                }
            }
        }
        if self.closed {
            return obj
                .keys()
                .find(|k| !self.properties.iter().any(|(p, _)| p == *k))
                .cloned();
        }
        None
    }
}

/// The effective contracts for one suite run.
pub struct SchemaSet {
    compiled: HashMap<SchemaName, Compiled>,
}

impl fmt::Debug for SchemaSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.compiled.keys().collect();
        names.sort();
        f.debug_struct("SchemaSet").field("schemas", &names).finish()
    }
}

impl SchemaSet {
    /// Compile the built-in contracts.
    ///
    /// # Errors
    ///
    /// Only if a built-in document fails to compile.
    pub fn builtin(variant: InventoryVariant) -> Result<Self, SchemaLoadError> {
        Self::with_overrides(variant, HashMap::new())
    }

    /// Built-in contracts with the config's file overrides applied.
    ///
    /// # Errors
    ///
    /// Returns error if an override cannot be read, parsed or compiled.
    pub fn from_config(config: &Config) -> Result<Self, SchemaLoadError> {
        let mut overrides = HashMap::new();
        for (name, path) in &config.schemas {
            overrides.insert(*name, load_document(path)?);
        }
        Self::with_overrides(config.inventory, overrides)
    }

    /// Built-in contracts, replacing any named in `overrides`.
    ///
    /// # Errors
    ///
    /// Returns error if a document fails to compile.
    pub fn with_overrides(
        variant: InventoryVariant,
        mut overrides: HashMap<SchemaName, Value>,
    ) -> Result<Self, SchemaLoadError> {
        let mut compiled = HashMap::new();
        for name in SchemaName::ALL {
            let document = overrides
                .remove(&name)
                .unwrap_or_else(|| contract(name, variant));
            compiled.insert(name, Compiled::new(name, document)?);
        }
        Ok(Self { compiled })
    }

    /// The JSON Schema document in effect for `name`.
    #[must_use]
    pub fn document(&self, name: SchemaName) -> Option<&Value> {
        self.compiled.get(&name).map(|c| &c.document)
    }

    /// Validate `body` against the contract `name`.
    ///
    /// # Errors
    ///
    /// Returns the offending field and the validator's messages.
    pub fn validate(&self, name: SchemaName, body: &Value) -> Result<(), SchemaError> {
        let Some(c) = self.compiled.get(&name) else {
            return Err(SchemaError {
                schema: name,
                field: None,
                messages: vec!["schema not loaded".to_string()],
            });
        };

        let messages: Vec<String> = c
            .validator
            .iter_errors(body)
            .take(5)
            .map(|e| e.to_string())
            .collect();
        if messages.is_empty() {
            return Ok(());
        }

        Err(SchemaError {
            schema: name,
            field: c.offending_field(body),
            messages,
        })
    }
}

/// Load a JSON Schema document from JSON or YAML.
///
/// Detection strategy: extension first (`.yaml`/`.yml`/`.json`), then content
/// sniffing (leading `{` → JSON, otherwise YAML).
pub fn load_document(path: &Path) -> Result<Value, SchemaLoadError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| SchemaLoadError::Io(path.to_path_buf(), e.to_string()))?;
    parse_document(path, &content)
}

fn parse_document(path: &Path, content: &str) -> Result<Value, SchemaLoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let as_yaml = || {
        serde_yml::from_str(content)
            .map_err(|e| SchemaLoadError::Parse(path.to_path_buf(), format!("Invalid YAML: {e}")))
    };
    let as_json = || {
        serde_json::from_str(content)
            .map_err(|e| SchemaLoadError::Parse(path.to_path_buf(), format!("Invalid JSON: {e}")))
    };

    match ext.as_str() {
        "yaml" | "yml" => as_yaml(),
        "json" => as_json(),
        _ if content.trim_start().starts_with('{') => as_json(),
        _ => as_yaml(),
    }
}
