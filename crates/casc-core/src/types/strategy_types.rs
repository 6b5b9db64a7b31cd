//! List and merge strategies for plugin reconciliation

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the expected plugin list is derived from the installed plugins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListStrategy {
    /// Pick ROOTS or ROOTS_AND_DEPS from the bundle apiVersion
    #[default]
    Auto,
    /// Only plugins nothing else requires
    Roots,
    /// Roots plus their non-optional dependencies
    RootsAndDeps,
    /// Every installed plugin
    All,
}

/// A list strategy with AUTO already resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolvedListStrategy {
    Roots,
    RootsAndDeps,
    All,
}

/// How the expected plugin list is merged into plugins.yaml and the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MergeStrategy {
    /// Keep everything, including bootstrap plugins
    All,
    /// Report only, never mutate
    DoNothing,
    /// Add missing plugins, never remove
    AddOnly,
    /// Add missing plugins and remove unexpected ones
    AddDelete,
    /// Like ADD_DELETE, but entries with a version or url survive
    #[default]
    AddDeleteSkipPinned,
}

impl ListStrategy {
    pub const NAMES: &'static [&'static str] = &["AUTO", "ROOTS", "ROOTS_AND_DEPS", "ALL"];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Auto => "AUTO",
            Self::Roots => "ROOTS",
            Self::RootsAndDeps => "ROOTS_AND_DEPS",
            Self::All => "ALL",
        }
    }

    /// Resolve AUTO against a bundle apiVersion: "1" is ROOTS_AND_DEPS, "2" is ROOTS.
    ///
    /// `source` names where the apiVersion came from, for the missing-version error.
    pub fn resolve(self, api_version: Option<&str>, source: &str) -> Result<ResolvedListStrategy> {
        match self {
            Self::Roots => Ok(ResolvedListStrategy::Roots),
            Self::RootsAndDeps => Ok(ResolvedListStrategy::RootsAndDeps),
            Self::All => Ok(ResolvedListStrategy::All),
            Self::Auto => match api_version {
                Some("1") => Ok(ResolvedListStrategy::RootsAndDeps),
                Some("2") => Ok(ResolvedListStrategy::Roots),
                Some(other) => Err(Error::invalid_api_version(other)),
                None => Err(Error::missing_api_version(source)),
            },
        }
    }
}

impl ResolvedListStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Roots => "ROOTS",
            Self::RootsAndDeps => "ROOTS_AND_DEPS",
            Self::All => "ALL",
        }
    }
}

impl MergeStrategy {
    pub const NAMES: &'static [&'static str] = &[
        "ALL",
        "DO_NOTHING",
        "ADD_ONLY",
        "ADD_DELETE",
        "ADD_DELETE_SKIP_PINNED",
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::DoNothing => "DO_NOTHING",
            Self::AddOnly => "ADD_ONLY",
            Self::AddDelete => "ADD_DELETE",
            Self::AddDeleteSkipPinned => "ADD_DELETE_SKIP_PINNED",
        }
    }

    /// Unexpected entries are removed
    pub fn should_delete(&self) -> bool {
        matches!(self, Self::AddDelete | Self::AddDeleteSkipPinned)
    }

    /// Pinned entries survive removal
    pub fn skip_pinned(&self) -> bool {
        matches!(self, Self::AddDeleteSkipPinned)
    }

    /// Files may be written
    pub fn allows_mutation(&self) -> bool {
        !matches!(self, Self::DoNothing)
    }
}

/// Normalize user input: case-insensitive, '-' accepted for '_'
fn normalize(s: &str) -> String {
    s.trim().to_ascii_uppercase().replace('-', "_")
}

impl FromStr for ListStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize(s).as_str() {
            "AUTO" => Ok(Self::Auto),
            "ROOTS" => Ok(Self::Roots),
            "ROOTS_AND_DEPS" => Ok(Self::RootsAndDeps),
            "ALL" => Ok(Self::All),
            _ => Err(Error::invalid_strategy(
                "plugins json list strategy",
                s,
                Self::NAMES,
            )),
        }
    }
}

impl FromStr for MergeStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize(s).as_str() {
            "ALL" => Ok(Self::All),
            "DO_NOTHING" => Ok(Self::DoNothing),
            "ADD_ONLY" => Ok(Self::AddOnly),
            "ADD_DELETE" => Ok(Self::AddDelete),
            "ADD_DELETE_SKIP_PINNED" => Ok(Self::AddDeleteSkipPinned),
            _ => Err(Error::invalid_strategy(
                "plugins json merge strategy",
                s,
                Self::NAMES,
            )),
        }
    }
}

impl fmt::Display for ListStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for ResolvedListStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
