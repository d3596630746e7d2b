//! PDF conversion behind a capability trait so the pipeline is testable
//! without LibreOffice. The production implementation shells out to
//! `soffice --headless` inside a temp directory.

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;
use tokio::process::Command;

lazy_static! {
    static ref MISSING_BINARY_RE: Regex =
        Regex::new(r"(?i)soffice|libreoffice|not found|no such file|command not found")
            .unwrap();
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("converter binary unavailable: {0}")]
    NotInstalled(String),
    #[error("conversion failed: {0}")]
    Failed(String),
}

/// Best-effort classification of an error message as "the external
/// converter binary is missing or not invokable".
pub fn looks_like_missing_binary(message: &str) -> bool {
    MISSING_BINARY_RE.is_match(message)
}

/// Capability interface for document-to-PDF conversion.
#[async_trait]
pub trait DocumentConverter: Send + Sync {
    async fn convert_to_pdf(&self, docx: &[u8]) -> Result<Vec<u8>, ConvertError>;
}

/// Converts by spawning LibreOffice. The spawn suspends the current task
/// only; other requests keep being served. No timeout is applied.
pub struct LibreOfficeConverter;

#[async_trait]
impl DocumentConverter for LibreOfficeConverter {
    async fn convert_to_pdf(&self, docx: &[u8]) -> Result<Vec<u8>, ConvertError> {
        let work_dir = tempfile::tempdir().map_err(|e| ConvertError::Failed(e.to_string()))?;
        let input_path = work_dir.path().join("input.docx");
        tokio::fs::write(&input_path, docx)
            .await
            .map_err(|e| ConvertError::Failed(e.to_string()))?;

        let output = Command::new("soffice")
            .arg("--headless")
            .arg("--convert-to")
            .arg("pdf")
            .arg("--outdir")
            .arg(work_dir.path())
            .arg(&input_path)
            .output()
            .await;

        let output = match output {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConvertError::NotInstalled(e.to_string()));
            }
            Err(e) => {
                let message = e.to_string();
                if looks_like_missing_binary(&message) {
                    return Err(ConvertError::NotInstalled(message));
                }
                return Err(ConvertError::Failed(message));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = format!(
                "soffice exited with status {}: {}",
                output.status.code().unwrap_or(-1),
                stderr.trim()
            );
            if looks_like_missing_binary(&stderr) {
                return Err(ConvertError::NotInstalled(message));
            }
            return Err(ConvertError::Failed(message));
        }

        let output_path = work_dir.path().join("input.pdf");
        tokio::fs::read(&output_path)
            .await
            .map_err(|e| ConvertError::Failed(format!("no PDF produced: {e}")))
    }
}
