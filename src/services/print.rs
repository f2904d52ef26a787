//! Turning rendered invoices into files and handing them on.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::{info, instrument, warn};

use crate::errors::ServiceError;

#[async_trait]
pub trait PrintService: Send + Sync {
    /// Writes `html` as a printable document named after `file_stem` and
    /// returns where it landed.
    async fn print_to_file(&self, html: &str, file_stem: &str) -> Result<PathBuf, ServiceError>;

    /// Hands a printed document to the sharing target and returns the shared copy.
    async fn share(&self, file: &Path) -> Result<PathBuf, ServiceError>;

    /// Removes whatever an interrupted `print_to_file` for `file_stem` left behind.
    async fn discard_partial(&self, _file_stem: &str) {}
}

/// Prints to `<output_dir>/<stem>.html` and shares by copying into `documents_dir`.
#[derive(Debug, Clone)]
pub struct FileSystemPrinter {
    output_dir: PathBuf,
    documents_dir: PathBuf,
}

impl FileSystemPrinter {
    pub fn new(output_dir: impl Into<PathBuf>, documents_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            documents_dir: documents_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn documents_dir(&self) -> &Path {
        &self.documents_dir
    }

    fn partial_path(&self, file_stem: &str) -> PathBuf {
        self.output_dir.join(format!("{}.html.part", file_stem))
    }
}

/// Removes a file that may or may not exist; failures are only logged.
pub(crate) async fn remove_quietly(path: &Path) {
    if let Err(err) = fs::remove_file(path).await {
        if err.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %path.display(), error = %err, "could not remove partial file");
        }
    }
}

#[async_trait]
impl PrintService for FileSystemPrinter {
    #[instrument(skip(self, html), fields(dir = %self.output_dir.display()))]
    async fn print_to_file(&self, html: &str, file_stem: &str) -> Result<PathBuf, ServiceError> {
        if file_stem.trim().is_empty() {
            return Err(ServiceError::InvalidInput(
                "document name cannot be empty".to_string(),
            ));
        }
        fs::create_dir_all(&self.output_dir).await?;

        // Written under a temporary name first so readers never see half a file.
        let target = self.output_dir.join(format!("{}.html", file_stem));
        let partial = self.partial_path(file_stem);
        if let Err(err) = fs::write(&partial, html).await {
            remove_quietly(&partial).await;
            return Err(err.into());
        }
        if let Err(err) = fs::rename(&partial, &target).await {
            remove_quietly(&partial).await;
            return Err(err.into());
        }

        info!(path = %target.display(), "invoice printed");
        Ok(target)
    }

    #[instrument(skip(self), fields(dir = %self.documents_dir.display()))]
    async fn share(&self, file: &Path) -> Result<PathBuf, ServiceError> {
        let name = file.file_name().ok_or_else(|| {
            ServiceError::InvalidInput(format!("cannot share '{}'", file.display()))
        })?;
        fs::create_dir_all(&self.documents_dir).await?;

        let target = self.documents_dir.join(name);
        if let Err(err) = fs::copy(file, &target).await {
            remove_quietly(&target).await;
            return Err(err.into());
        }

        info!(path = %target.display(), "invoice shared");
        Ok(target)
    }
    async fn discard_partial(&self, file_stem: &str) {
        remove_quietly(&self.partial_path(file_stem)).await;
    }
}
