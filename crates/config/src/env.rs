//! Environment-variable stores the resolver reads from

use std::collections::HashMap;
use std::path::Path;
use types::ConfigError;

/// Read-only view of a name to value mapping
pub trait EnvSource {
    /// Look up a variable. `None` when the variable is not set.
    fn get(&self, key: &str) -> Option<String>;
}

/// The live process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        // Non-UTF-8 values are treated as unset
        std::env::var(key).ok()
    }
}

/// In-memory store, used by tests and by embedders that assemble their own
/// settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Parse a dotenv file. A missing file yields an empty store.
    pub fn from_dotenv_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        // Only non-mutating parser in dotenv 0.15; dotenv() would write to the process
        #[allow(deprecated)]
        let iter = match dotenv::from_path_iter(path) {
            Ok(iter) => iter,
            Err(e) if e.not_found() => return Ok(Self::new()),
            Err(e) => {
                return Err(ConfigError::ParseError(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        let mut vars = HashMap::new();
        for item in iter {
            let (key, value) = item.map_err(|e| {
                ConfigError::ParseError(format!("Failed to parse {}: {}", path.display(), e))
            })?;
            vars.insert(key, value);
        }

        Ok(Self { vars })
    }
}

impl EnvSource for MapEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

impl<K, V> FromIterator<(K, V)> for MapEnv
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Process environment layered over an optional dotenv file.
///
/// Lookups consult the process first. A variable already exported in the
/// process is never overridden by the file.
#[derive(Debug, Clone, Default)]
pub struct EnvStore {
    process: ProcessEnv,
    file: MapEnv,
}

impl EnvStore {
    /// Store backed only by the process environment
    pub fn process() -> Self {
        Self::default()
    }

    /// Store backed by the process environment and the given dotenv file
    pub fn with_dotenv<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Ok(Self {
            process: ProcessEnv,
            file: MapEnv::from_dotenv_file(path)?,
        })
    }

    /// Entries contributed by the dotenv file
    pub fn file_entries(&self) -> &MapEnv {
        &self.file
    }
}

impl EnvSource for EnvStore {
    fn get(&self, key: &str) -> Option<String> {
        self.process.get(key).or_else(|| self.file.get(key))
    }
}

impl<T: EnvSource + ?Sized> EnvSource for &T {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}
