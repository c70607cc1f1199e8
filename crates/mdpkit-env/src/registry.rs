//! Environment registry for creating environments by name

use std::any::type_name;
use std::fmt;

use indexmap::IndexMap;

use mdpkit_core::{EnvError, Environment, Result};

use crate::EnvArgs;

/// Boxed constructor stored in the registry
pub type EnvConstructor = Box<dyn Fn(&EnvArgs) -> Result<Box<dyn Environment>> + Send + Sync>;

/// Simplified factory building a ready-to-use environment from a few
/// high-level parameters
pub type Generator<E> = fn(&EnvArgs) -> Result<E>;

/// An environment type that can be registered by name.
pub trait Registrable: Environment + Sized + 'static {
    /// Registry key. Defaults to the bare type name.
    fn env_name() -> &'static str {
        short_type_name::<Self>()
    }

    /// Construct from fully resolved arguments
    fn create(args: &EnvArgs) -> Result<Self>;

    /// Alternate factory used by [`EnvRegistry::generate`], if the type has one
    fn generator() -> Option<Generator<Self>> {
        None
    }
}

fn short_type_name<T: ?Sized>() -> &'static str {
    let full = type_name::<T>();
    let path = full.split('<').next().unwrap_or(full);
    path.rsplit("::").next().unwrap_or(path)
}

struct Entry {
    // `None` for closure registrations
    source: Option<&'static str>,
    create: EnvConstructor,
    generate: Option<EnvConstructor>,
}

/// Name to constructor mapping.
///
/// Names keep their registration order. Registering a name that is already
/// present is ignored, so the first registration wins.
#[derive(Default)]
pub struct EnvRegistry {
    entries: IndexMap<String, Entry>,
}

impl EnvRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an environment type under [`Registrable::env_name`].
    ///
    /// Returns `false` if the name was already taken.
    pub fn register<E: Registrable>(&mut self) -> bool {
        let create: EnvConstructor =
            Box::new(|args: &EnvArgs| -> Result<Box<dyn Environment>> {
                Ok(Box::new(E::create(args)?))
            });
        let generate = E::generator().map(|generator| {
            Box::new(move |args: &EnvArgs| -> Result<Box<dyn Environment>> {
                Ok(Box::new(generator(args)?))
            }) as EnvConstructor
        });

        self.insert(E::env_name(), Some(type_name::<E>()), create, generate)
    }

    /// Register a constructor closure under `name`
    pub fn register_with<F>(&mut self, name: impl Into<String>, constructor: F) -> bool
    where
        F: Fn(&EnvArgs) -> Result<Box<dyn Environment>> + Send + Sync + 'static,
    {
        self.insert(name, None, Box::new(constructor), None)
    }

    /// Register a constructor closure together with a generate factory
    pub fn register_with_generator<F, G>(
        &mut self,
        name: impl Into<String>,
        constructor: F,
        generator: G,
    ) -> bool
    where
        F: Fn(&EnvArgs) -> Result<Box<dyn Environment>> + Send + Sync + 'static,
        G: Fn(&EnvArgs) -> Result<Box<dyn Environment>> + Send + Sync + 'static,
    {
        self.insert(name, None, Box::new(constructor), Some(Box::new(generator)))
    }

    fn insert(
        &mut self,
        name: impl Into<String>,
        source: Option<&'static str>,
        create: EnvConstructor,
        generate: Option<EnvConstructor>,
    ) -> bool {
        let name = name.into();

        if let Some(existing) = self.entries.get(&name) {
            if existing.source == source && source.is_some() {
                tracing::debug!(name = %name, "environment already registered");
            } else {
                tracing::warn!(
                    name = %name,
                    kept = existing.source.unwrap_or("<closure>"),
                    ignored = source.unwrap_or("<closure>"),
                    "ignoring registration, name already taken"
                );
            }
            return false;
        }

        tracing::debug!(name = %name, generator = generate.is_some(), "registered environment");
        self.entries.insert(
            name,
            Entry {
                source,
                create,
                generate,
            },
        );
        true
    }

    fn entry(&self, name: &str) -> Result<&Entry> {
        self.entries
            .get(name)
            .ok_or_else(|| EnvError::UnknownEnvironment(name.to_string()))
    }

    /// Whether `name` is registered
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// List registered environments in registration order
    #[must_use]
    pub fn list_registered(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Create an environment by name through its constructor
    pub fn create(&self, name: &str, args: &EnvArgs) -> Result<Box<dyn Environment>> {
        let entry = self.entry(name)?;
        tracing::debug!(name = %name, "creating environment");
        (entry.create)(args)
    }

    /// Create an environment by name through its generate factory
    pub fn generate(&self, name: &str, args: &EnvArgs) -> Result<Box<dyn Environment>> {
        let entry = self.entry(name)?;
        let generate = entry
            .generate
            .as_ref()
            .ok_or_else(|| EnvError::MissingGenerator(name.to_string()))?;
        tracing::debug!(name = %name, "generating environment");
        generate(args)
    }
}

impl fmt::Debug for EnvRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvRegistry")
            .field("envs", &self.list_registered())
            .finish()
    }
}
