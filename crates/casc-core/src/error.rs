//! Error types for casc-core

use thiserror::Error;

/// Result type alias using casc-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Broad classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid strategy names or bundle descriptors, rejected before any graph work
    Config,
    /// Corrupt or internally inconsistent plugin metadata
    Data,
    /// Failures of the collaborators feeding the engine (files, network, parsing)
    Input,
}

/// Core error types for casc bundle utilities
#[derive(Error, Debug)]
pub enum Error {
    /// Unknown strategy name
    #[error("Invalid {kind}: {value} (out of {expected})")]
    InvalidStrategy {
        kind: String,
        value: String,
        expected: String,
    },

    /// apiVersion present but not understood by the AUTO list strategy
    #[error("Invalid apiVersion found in bundle.yaml file: {value}")]
    InvalidApiVersion { value: String },

    /// AUTO list strategy requested without an apiVersion to resolve it from
    #[error("No apiVersion found in {path}")]
    MissingApiVersion { path: String },

    /// Non-optional dependency cycle found while rendering a dependency tree
    #[error("Cyclic dependency detected: {path}")]
    CyclicDependency { path: String },

    /// Expected, bootstrap and deleted/inactive plugins do not cover the installed set
    #[error(
        "Sanity check failed. Reduced plugins and bootstrap plugins do not match original plugins \
         (missing: [{}], extra: [{}])",
        .missing.join(", "),
        .extra.join(", ")
    )]
    SanityCheckFailed {
        missing: Vec<String>,
        extra: Vec<String>,
    },

    /// Non-optional dependency on a plugin absent from the plugin list
    #[error("Plugin {plugin} depends on {dependency}, which is not in the plugin list")]
    MissingDependency { plugin: String, dependency: String },

    /// Required input file not found
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// Remote request failed
    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidStrategy { .. }
            | Self::InvalidApiVersion { .. }
            | Self::MissingApiVersion { .. } => ErrorKind::Config,
            Self::CyclicDependency { .. }
            | Self::SanityCheckFailed { .. }
            | Self::MissingDependency { .. } => ErrorKind::Data,
            Self::FileNotFound { .. }
            | Self::Fetch { .. }
            | Self::YamlParse(_)
            | Self::JsonParse(_)
            | Self::Io(_) => ErrorKind::Input,
        }
    }

    /// Create an invalid strategy error
    pub fn invalid_strategy(
        kind: impl Into<String>,
        value: impl Into<String>,
        expected: &[&str],
    ) -> Self {
        Self::InvalidStrategy {
            kind: kind.into(),
            value: value.into(),
            expected: expected.join(", "),
        }
    }

    /// Create an invalid apiVersion error
    pub fn invalid_api_version(value: impl Into<String>) -> Self {
        Self::InvalidApiVersion {
            value: value.into(),
        }
    }

    /// Create a missing apiVersion error
    pub fn missing_api_version(path: impl Into<String>) -> Self {
        Self::MissingApiVersion { path: path.into() }
    }

    /// Create a cyclic dependency error from the offending chain
    pub fn cyclic_dependency(chain: &[String], repeated: &str) -> Self {
        Self::CyclicDependency {
            path: format!("{} -> {}", chain.join(" -> "), repeated),
        }
    }

    /// Create a sanity check error
    pub fn sanity_check_failed(missing: Vec<String>, extra: Vec<String>) -> Self {
        Self::SanityCheckFailed { missing, extra }
    }

    /// Create a missing dependency error
    pub fn missing_dependency(plugin: impl Into<String>, dependency: impl Into<String>) -> Self {
        Self::MissingDependency {
            plugin: plugin.into(),
            dependency: dependency.into(),
        }
    }

    /// Create a file not found error
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a fetch error
    pub fn fetch(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.into(),
        }
    }
}
