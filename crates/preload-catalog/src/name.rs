use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier of a native module, unique within a process.
///
/// The name is what the embedding application declares (`"vrapi"`), not the
/// file on disk (`libvrapi.so`). Mapping to a file is the platform loader's job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LibraryName(String);

impl LibraryName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for LibraryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LibraryName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for LibraryName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl From<&LibraryName> for LibraryName {
    fn from(name: &LibraryName) -> Self {
        name.clone()
    }
}

impl AsRef<str> for LibraryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Lets maps keyed by `LibraryName` be queried with a plain `&str`.
impl Borrow<str> for LibraryName {
    fn borrow(&self) -> &str {
        &self.0
    }
}
