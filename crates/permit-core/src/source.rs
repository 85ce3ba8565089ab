//! Where permit records come from

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{Result, SourceError};
use crate::types::Permit;

/// Supplies the full permit collection on demand.
///
/// Implementations return either the complete, schema-valid collection or an
/// error; there are no partial results.
pub trait PermitSource: Send + Sync {
    fn load(&self) -> Result<Vec<Permit>>;
}

/// Reads a JSON array of permits from disk on every call
#[derive(Debug, Clone)]
pub struct JsonFilePermitSource {
    path: PathBuf,
}

impl JsonFilePermitSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PermitSource for JsonFilePermitSource {
    fn load(&self) -> Result<Vec<Permit>> {
        let raw = std::fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        let permits = parse_permits(&raw)?;
        tracing::debug!(path = %self.path.display(), count = permits.len(), "Loaded permits");
        Ok(permits)
    }
}

/// Fixed collection held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryPermitSource {
    permits: Arc<Vec<Permit>>,
}

impl InMemoryPermitSource {
    pub fn new(permits: Vec<Permit>) -> Self {
        Self {
            permits: Arc::new(permits),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        parse_permits(raw).map(Self::new)
    }
}

impl PermitSource for InMemoryPermitSource {
    fn load(&self) -> Result<Vec<Permit>> {
        Ok(self.permits.as_ref().clone())
    }
}

/// Parse and validate a JSON array of permits
pub fn parse_permits(raw: &str) -> Result<Vec<Permit>> {
    let permits: Vec<Permit> = serde_json::from_str(raw)?;
    validate_permits(&permits)?;
    Ok(permits)
}

/// Checks serde cannot express: non-negative amounts and unique identifiers
pub fn validate_permits(permits: &[Permit]) -> Result<()> {
    let mut seen = HashSet::with_capacity(permits.len());
    for permit in permits {
        let amount = permit.improvement_amount.as_f64().unwrap_or(f64::NAN);
        if !(amount.is_finite() && amount >= 0.0) {
            return Err(SourceError::Invalid {
                permit_id: permit.permit_id.clone(),
                reason: format!(
                    "improvementAmount must be non-negative, got {}",
                    permit.improvement_amount
                ),
            });
        }
        if !seen.insert(permit.permit_id.as_str()) {
            return Err(SourceError::Invalid {
                permit_id: permit.permit_id.clone(),
                reason: "duplicate permitId".to_string(),
            });
        }
    }
    Ok(())
}
