//! In-memory vault: secret name -> secret value.
//!
//! `Vault` owns every mutation of the secret map.  Nothing here touches
//! the disk; a change only survives if the caller commits it through
//! `VaultFile::save`.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;
use zeroize::Zeroize;

use crate::errors::{Result, VaultKeepError};

use super::search;

/// The decrypted secret map.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct Vault {
    secrets: HashMap<String, String>,
}

impl Vault {
    /// Create an empty vault.
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Secret operations
    // ------------------------------------------------------------------

    /// Add or overwrite a secret.  Last write wins.
    pub fn add(&mut self, name: &str, value: &str) -> Result<()> {
        Self::validate_secret_name(name)?;
        if let Some(mut old) = self.secrets.insert(name.to_string(), value.to_string()) {
            old.zeroize();
        }
        Ok(())
    }

    /// Return the value stored under `name`.
    pub fn get(&self, name: &str) -> Result<&str> {
        self.secrets
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| VaultKeepError::SecretNotFound(name.to_string()))
    }

    /// Returns `true` if the vault contains a secret with the given name.
    pub fn exists(&self, name: &str) -> bool {
        self.secrets.contains_key(name)
    }

    /// Replace the value of an existing secret.
    ///
    /// Unlike `add`, this never creates an entry: an absent name is a
    /// `SecretNotFound` and the vault is left untouched.
    pub fn update(&mut self, name: &str, new_value: &str) -> Result<()> {
        let slot = self
            .secrets
            .get_mut(name)
            .ok_or_else(|| VaultKeepError::SecretNotFound(name.to_string()))?;
        slot.zeroize();
        *slot = new_value.to_string();
        Ok(())
    }

    /// Remove a secret from the vault.
    pub fn delete(&mut self, name: &str) -> Result<()> {
        match self.secrets.remove(name) {
            Some(mut value) => {
                value.zeroize();
                Ok(())
            }
            None => Err(VaultKeepError::SecretNotFound(name.to_string())),
        }
    }

    /// All secret names.  Order carries no meaning; it is sorted only to
    /// make listings stable.
    pub fn list_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.secrets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Fuzzy-search secret names, most relevant first.
    pub fn search(&self, pattern: &str, max_results: usize) -> Vec<&str> {
        search::rank(self.secrets.keys().map(String::as_str), pattern, max_results)
    }

    /// Returns the number of secrets in the vault.
    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    /// Returns `true` if the vault holds no secrets.
    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }

    // ------------------------------------------------------------------
    // Serialization
    // ------------------------------------------------------------------

    /// Serialize the secret map as a JSON object.
    ///
    /// Keys are written in sorted order so the same vault always yields
    /// the same plaintext.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let sorted: BTreeMap<&str, &str> = self
            .secrets
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();

        serde_json::to_vec(&sorted)
            .map_err(|e| VaultKeepError::SerializationError(format!("vault: {e}")))
    }

    /// Rebuild a vault from bytes produced by `serialize`.
    ///
    /// The payload must be a JSON object whose values are all strings.
    /// Anything else is a `FormatError`; nothing is coerced.
    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| VaultKeepError::FormatError(format!("not valid JSON: {e}")))?;

        let Value::Object(entries) = value else {
            return Err(VaultKeepError::FormatError(
                "payload is not a name -> value mapping".into(),
            ));
        };

        let mut secrets = HashMap::with_capacity(entries.len());
        for (name, value) in entries {
            match value {
                Value::String(s) => {
                    secrets.insert(name, s);
                }
                other => {
                    return Err(VaultKeepError::FormatError(format!(
                        "value of '{name}' is {}, expected a string",
                        json_type_name(&other)
                    )));
                }
            }
        }

        Ok(Self { secrets })
    }

    // ------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------

    /// A secret name must be non-empty and printable.
    fn validate_secret_name(name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(VaultKeepError::InvalidInput(
                "secret name cannot be empty".into(),
            ));
        }
        if name.chars().any(char::is_control) {
            return Err(VaultKeepError::InvalidInput(format!(
                "secret name '{}' contains control characters",
                name.escape_debug()
            )));
        }
        Ok(())
    }
}

impl Drop for Vault {
    fn drop(&mut self) {
        for value in self.secrets.values_mut() {
            value.zeroize();
        }
    }
}

// Values never show up in debug output.
impl std::fmt::Debug for Vault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vault")
            .field("names", &self.list_names())
            .finish()
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
