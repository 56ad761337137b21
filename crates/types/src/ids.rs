//! Newtype wrappers for semantic names and runtime identifiers
//!
//! These types provide compile-time type safety to prevent mixing up
//! different kinds of identifiers (function names, group names, band indices, etc.).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// The name under which a function is registered, looked up by other
/// functions and by rendered nodes.
#[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FunctionName(Arc<str>);

impl FunctionName {
    /// Creates a new FunctionName from a string
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    /// Returns the string representation of this function name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for FunctionName {
    fn from(s: String) -> Self {
        Self(s.into())
    }
}

impl From<&str> for FunctionName {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

impl AsRef<str> for FunctionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FunctionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The name of a grouping level in a report definition.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupName(Arc<str>);

impl GroupName {
    /// Creates a new GroupName from a string
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    /// Returns the string representation of this group name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for GroupName {
    fn from(s: String) -> Self {
        Self(s.into())
    }
}

impl From<&str> for GroupName {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

impl AsRef<str> for GroupName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies one runtime occurrence of a group. Allocated in row order, so a
/// later instance always has a larger id.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct GroupInstanceId(pub u32);

impl fmt::Display for GroupInstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// Position of a band in the content tree.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct BandId(pub u32);

impl BandId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<usize> for BandId {
    fn from(index: usize) -> Self {
        Self(index as u32)
    }
}

impl fmt::Display for BandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "b{}", self.0)
    }
}
