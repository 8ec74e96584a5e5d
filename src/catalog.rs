use crate::error::AppError;
use crate::metadata::ImageRecord;
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Read-only view over extracted metadata.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// All records, or only those whose `date` equals `date` exactly.
    async fn images(&self, date: Option<String>) -> Result<Vec<ImageRecord>, AppError>;
    /// Distinct non-empty `date` values in ascending string order.
    async fn dates(&self) -> Result<Vec<String>, AppError>;
}

/// Catalog backed by the sidecar JSON file, re-read on every call.
pub struct JsonCatalog {
    path: PathBuf,
}

impl JsonCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn load(&self) -> Result<Vec<ImageRecord>, AppError> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("Metadata file {:?} not found, serving empty catalog", self.path);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl Catalog for JsonCatalog {
    async fn images(&self, date: Option<String>) -> Result<Vec<ImageRecord>, AppError> {
        let records = self.load().await?;
        Ok(match date.filter(|d| !d.is_empty()) {
            Some(date) => records.into_iter().filter(|r| r.date == date).collect(),
            None => records,
        })
    }

    async fn dates(&self) -> Result<Vec<String>, AppError> {
        let dates: BTreeSet<String> = self
            .load()
            .await?
            .into_iter()
            .map(|r| r.date)
            .filter(|d| !d.is_empty())
            .collect();
        Ok(dates.into_iter().collect())
    }
}
