//! Layered folder stubs (presentation, application, domain, infrastructure)
//! for a list of microservice descriptors.

mod templates;

use std::fs;
use std::path::{Path, PathBuf};

use contexta_core::lenient;
use serde::Deserialize;
use serde_json::Value;

pub const DEFAULT_INPUT: &str = "./microservices.json";
pub const OUTPUT_DIR: &str = "services";

#[derive(Debug, thiserror::Error)]
pub enum ScaffoldError {
    #[error("Input file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid JSON in {}: {source}", .path.display())]
    InvalidJson {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("No microservices defined in {}", .0.display())]
    NoServices(PathBuf),
    #[error("Could not write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ScaffoldError {
    /// Process exit status: 2 for unusable input, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        match self {
            ScaffoldError::NotFound(_) | ScaffoldError::Read { .. } | ScaffoldError::InvalidJson { .. } => 2,
            ScaffoldError::NoServices(_) | ScaffoldError::Write { .. } => 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PublicApi {
    #[serde(default, deserialize_with = "lenient::string")]
    pub method: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub path: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDescriptor {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub responsibilities: Vec<String>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub data_ownership: Vec<String>,
    #[serde(default, rename = "publicAPIs", deserialize_with = "lenient::seq")]
    pub public_apis: Vec<PublicApi>,
}

impl ServiceDescriptor {
    /// `name`, else `id`, else `"service"`.
    pub fn display_name(&self) -> &str {
        [self.name.as_str(), self.id.as_str()]
            .into_iter()
            .find(|s| !s.is_empty())
            .unwrap_or("service")
    }

    /// Falls back to `service` when nothing alphanumeric is left.
    pub fn folder_name(&self) -> String {
        let name = safe_name(self.display_name());
        if name.is_empty() {
            "service".to_string()
        } else {
            name
        }
    }
}

/// Lowercase, collapse every run of non-alphanumerics to `_`, trim `_` from
/// both ends.
pub fn safe_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut gap = false;
    for c in name.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if gap && !out.is_empty() {
                out.push('_');
            }
            gap = false;
            out.push(c);
        } else {
            gap = true;
        }
    }
    out
}

/// Services from an array or a `{ "microservices": [...] }` object. Entries
/// that are not objects become nameless descriptors.
pub fn parse_services(value: Value) -> Vec<ServiceDescriptor> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("microservices") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };
    items
        .into_iter()
        .map(|item| serde_json::from_value(item).unwrap_or_default())
        .collect()
}

pub fn load_services(path: &Path) -> Result<Vec<ServiceDescriptor>, ScaffoldError> {
    if !path.exists() {
        return Err(ScaffoldError::NotFound(path.to_path_buf()));
    }
    let raw = fs::read_to_string(path).map_err(|source| ScaffoldError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&raw).map_err(|source| ScaffoldError::InvalidJson {
        path: path.to_path_buf(),
        source,
    })?;
    let services = parse_services(value);
    if services.is_empty() {
        return Err(ScaffoldError::NoServices(path.to_path_buf()));
    }
    Ok(services)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Created(PathBuf),
    Skipped(PathBuf),
}

fn write_if_missing(path: PathBuf, content: &str) -> Result<FileOutcome, ScaffoldError> {
    if path.exists() {
        tracing::info!("skip (exists): {}", path.display());
        return Ok(FileOutcome::Skipped(path));
    }
    let write = |p: &Path| -> std::io::Result<()> {
        if let Some(dir) = p.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(p, content)
    };
    write(&path).map_err(|source| ScaffoldError::Write {
        path: path.clone(),
        source,
    })?;
    tracing::info!("created: {}", path.display());
    Ok(FileOutcome::Created(path))
}

/// Write the stub tree for one service under `base`. Existing files are left
/// untouched.
pub fn generate_service(
    base: &Path,
    service: &ServiceDescriptor,
) -> Result<Vec<FileOutcome>, ScaffoldError> {
    let dir = base.join(service.folder_name());
    let name = service.display_name();
    let files = [
        (dir.join("presentation").join("api.js"), templates::api(name)),
        (dir.join("application").join("useCases.js"), templates::use_cases(name)),
        (dir.join("domain").join("entities.js"), templates::entities(name)),
        (dir.join("domain").join("repositories.js"), templates::repositories(name)),
        (dir.join("infrastructure").join("repository.js"), templates::repository_impl(name)),
        (dir.join("infrastructure").join("events.js"), templates::events(name)),
        (dir.join("README.md"), templates::readme(service)),
    ];
    files
        .into_iter()
        .map(|(path, content)| write_if_missing(path, &content))
        .collect()
}

/// Scaffold every service into `out_dir`.
pub fn generate_all(
    out_dir: &Path,
    services: &[ServiceDescriptor],
) -> Result<Vec<FileOutcome>, ScaffoldError> {
    fs::create_dir_all(out_dir).map_err(|source| ScaffoldError::Write {
        path: out_dir.to_path_buf(),
        source,
    })?;
    let mut outcomes = Vec::new();
    for service in services {
        outcomes.extend(generate_service(out_dir, service)?);
    }
    Ok(outcomes)
}
