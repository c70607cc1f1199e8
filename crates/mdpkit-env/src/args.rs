//! Arguments forwarded to environment constructors

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use mdpkit_core::{EnvError, Result};

/// Positional and keyword arguments handed unchanged to a constructor or a
/// generate factory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvArgs {
    /// Positional arguments
    #[serde(default)]
    pub positional: Vec<Value>,
    /// Keyword arguments
    #[serde(flatten)]
    pub params: Map<String, Value>,
}

impl EnvArgs {
    /// Empty argument set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument
    #[must_use]
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Set a keyword argument
    #[must_use]
    pub fn kwarg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Set a keyword argument from any serializable value
    pub fn kwarg_serialized<T: Serialize + ?Sized>(
        self,
        key: impl Into<String>,
        value: &T,
    ) -> Result<Self> {
        Ok(self.kwarg(key, serde_json::to_value(value)?))
    }

    /// Look up an argument passed either by keyword or at `index`.
    /// The keyword wins when both are present.
    pub fn lookup<T: DeserializeOwned>(&self, index: usize, key: &str) -> Result<Option<T>> {
        let value = self.params.get(key).or_else(|| self.positional.get(index));
        match value {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| EnvError::InvalidArgument(format!("{key}: {e}"))),
        }
    }

    /// Like [`EnvArgs::lookup`] but the argument must be present
    pub fn require<T: DeserializeOwned>(&self, index: usize, key: &str) -> Result<T> {
        self.lookup(index, key)?
            .ok_or_else(|| EnvError::InvalidArgument(format!("missing argument `{key}`")))
    }

    /// Like [`EnvArgs::lookup`] with a fallback
    pub fn lookup_or<T: DeserializeOwned>(&self, index: usize, key: &str, default: T) -> Result<T> {
        Ok(self.lookup(index, key)?.unwrap_or(default))
    }

    /// Deserialize all keyword arguments into a config struct
    pub fn params_as<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(Value::Object(self.params.clone()))
            .map_err(|e| EnvError::InvalidArgument(e.to_string()))
    }
}
