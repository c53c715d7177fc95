//! Schemas loaded once at startup and reused for every data validation.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::schema::{Schema, SchemaError};

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("schema root {0} is not a directory")]
    NotADirectory(String),
    #[error("I/O error reading schema root: {0}")]
    Io(#[from] std::io::Error),
}

/// A schema that passed validation at load time.
#[derive(Debug, Clone)]
pub struct RegisteredSchema {
    pub schema: Arc<Schema>,
    /// `sha256:<hex>` of the canonical JSON form.
    pub fingerprint: String,
}

#[derive(Debug, Serialize)]
pub struct SchemaSummary {
    pub name: String,
    pub kind: String,
    pub fingerprint: String,
}

#[derive(Debug, Serialize)]
pub struct RejectedSchema {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, RegisteredSchema>,
    rejected: BTreeMap<String, String>,
}

impl SchemaRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load every `*.json` file directly inside `root`.
    ///
    /// Subdirectories and symlinks are skipped. Files that cannot be read,
    /// fail to parse or fail schema validation are recorded as rejected and
    /// never served; only a missing or unlistable root is an error.
    pub fn load(root: &Path) -> Result<Self, RegistryError> {
        if !root.is_dir() {
            return Err(RegistryError::NotADirectory(root.display().to_string()));
        }

        let mut registry = Self::default();

        for entry in std::fs::read_dir(root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }

            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }

            let Some(name) = path.file_stem().map(|stem| stem.to_string_lossy().to_string()) else {
                continue;
            };

            let text = match std::fs::read_to_string(&path) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(schema = %name, error = %e, "cannot read schema file");
                    registry.rejected.insert(name, format!("cannot read schema file: {e}"));
                    continue;
                }
            };

            match serde_json::from_str::<Value>(&text) {
                Ok(document) => {
                    registry.insert(name, &document);
                }
                Err(e) => {
                    tracing::warn!(schema = %name, error = %e, "schema file is not valid JSON");
                    registry.rejected.insert(name, SchemaError::Parse(e).to_string());
                }
            }
        }

        tracing::info!(
            root = %root.display(),
            loaded = registry.schemas.len(),
            rejected = registry.rejected.len(),
            "schema registry loaded"
        );

        Ok(registry)
    }

    /// Validate `document` and register it under `name`.
    ///
    /// Returns `false` if the document was rejected.
    pub fn insert(&mut self, name: impl Into<String>, document: &Value) -> bool {
        let name = name.into();
        match Schema::from_json(document) {
            Ok(schema) => {
                let fingerprint = fingerprint(&schema);
                tracing::debug!(schema = %name, %fingerprint, "schema registered");
                self.rejected.remove(&name);
                self.schemas.insert(
                    name,
                    RegisteredSchema { schema: Arc::new(schema), fingerprint },
                );
                true
            }
            Err(e) => {
                tracing::warn!(schema = %name, error = %e, "schema rejected");
                self.schemas.remove(&name);
                self.rejected.insert(name, e.to_string());
                false
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredSchema> {
        self.schemas.get(name)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Accepted schemas, sorted by name.
    pub fn entries(&self) -> Vec<SchemaSummary> {
        self.schemas
            .iter()
            .map(|(name, registered)| SchemaSummary {
                name: name.clone(),
                kind: registered.schema.kind().as_str().to_string(),
                fingerprint: registered.fingerprint.clone(),
            })
            .collect()
    }

    /// Rejected files with the reason they were refused, sorted by name.
    pub fn rejected(&self) -> Vec<RejectedSchema> {
        self.rejected
            .iter()
            .map(|(name, reason)| RejectedSchema {
                name: name.clone(),
                reason: reason.clone(),
            })
            .collect()
    }
}

fn fingerprint(schema: &Schema) -> String {
    let digest = Sha256::digest(schema.to_canonical_json().as_bytes());
    format!("sha256:{digest:x}")
}
