//! Mail-merge pipeline: validate the upload, extract data rows, derive
//! per-row file names, render one document per row (optionally converting
//! each to PDF), and bundle everything into a single ZIP.
//!
//! Every stage fails fast and aborts the whole request. No state survives a
//! request.

pub mod archive;
pub mod convert;
pub mod handlers;
pub mod models;
pub mod multipart;
pub mod naming;
pub mod render;
pub mod rows;

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use thiserror::Error;

use crate::ErrorBody;
use self::convert::ConvertError;

/// Errors surfaced by the generation pipeline. Validation, parse and
/// template faults are client errors; conversion and archival faults are
/// server errors.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Missing template file. Upload a .docx file.")]
    MissingTemplate,
    #[error("Template must be a .docx file.")]
    InvalidTemplateExtension,
    #[error("Missing data file. Upload a .csv or .xlsx file.")]
    MissingDataFile,
    #[error("Data file must be .csv or .xlsx.")]
    InvalidDataExtension,
    #[error("Invalid outputFormat. Use docx, pdf, or both.")]
    InvalidOutputFormat,
    #[error("Upload too large. Total request size is capped at 20 MiB.")]
    PayloadTooLarge,
    #[error("Multipart field error.")]
    Multipart(String),
    #[error("Invalid spreadsheet. Could not parse data file.")]
    Spreadsheet { detail: String },
    #[error("Data file has no rows (only headers or empty).")]
    EmptyData,
    #[error("Template error when generating a document.")]
    Template { detail: String, row_index: usize },
    #[error("PDF conversion failed: LibreOffice is not installed or not on the system PATH. Install LibreOffice (https://www.libreoffice.org/) and ensure it can be run from the command line.")]
    ConverterNotInstalled { detail: String },
    #[error("PDF conversion failed. LibreOffice must be installed on the server for PDF output.")]
    Conversion { detail: String },
    #[error("Failed to create ZIP.")]
    Archive { detail: String },
}

impl GenerateError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GenerateError::Multipart(_)
            | GenerateError::ConverterNotInstalled { .. }
            | GenerateError::Conversion { .. }
            | GenerateError::Archive { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    pub fn to_response(&self) -> HttpResponse {
        let status = self.status_code();
        let mut body = ErrorBody::new(self.to_string());
        match self {
            GenerateError::Multipart(detail)
            | GenerateError::Spreadsheet { detail }
            | GenerateError::ConverterNotInstalled { detail }
            | GenerateError::Conversion { detail }
            | GenerateError::Archive { detail } => {
                body.detail = Some(detail.clone());
            }
            GenerateError::Template { detail, row_index } => {
                body.detail = Some(detail.clone());
                body.row_index = Some(*row_index);
            }
            _ => {}
        }
        if status.is_server_error() {
            log::error!(
                "{} (detail: {})",
                body.error,
                body.detail.as_deref().unwrap_or("none")
            );
        }
        HttpResponse::build(status).json(body)
    }
}

impl From<GenerateError> for HttpResponse {
    fn from(error: GenerateError) -> Self {
        error.to_response()
    }
}

impl From<ConvertError> for GenerateError {
    fn from(error: ConvertError) -> Self {
        match error {
            ConvertError::NotInstalled(detail) => GenerateError::ConverterNotInstalled { detail },
            ConvertError::Failed(detail) => {
                // The message-pattern heuristic is best effort: a generic
                // failure whose message points at a missing binary is
                // reported as "not installed" too.
                if convert::looks_like_missing_binary(&detail) {
                    GenerateError::ConverterNotInstalled { detail }
                } else {
                    GenerateError::Conversion { detail }
                }
            }
        }
    }
}
