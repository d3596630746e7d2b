use actix_multipart::Multipart;
use actix_web::http::header;
use actix_web::{web, HttpResponse};
use log::info;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{AppState, ErrorBody};

use super::convert::DocumentConverter;
use super::models::{GeneratedFile, OutputFormat};
use super::multipart::UploadParser;
use super::{archive, naming, render, rows, GenerateError};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/generate").route(web::post().to(generate)));
}

#[derive(Debug, Deserialize)]
pub struct GenerateQuery {
    #[serde(rename = "outputFormat")]
    pub output_format: Option<String>,
}

#[derive(Debug, ToSchema)]
pub struct GenerateRequest {
    #[allow(unused)]
    pub template: Vec<u8>,
    #[allow(unused)]
    pub data: Vec<u8>,
}

#[utoipa::path(
    context_path = "/api",
    tag = "Generate Service",
    post,
    path = "/generate",
    request_body(content = inline(GenerateRequest), content_type = "multipart/form-data"),
    params(
        ("outputFormat" = Option<String>, Query, description = "docx (default), pdf, or both")
    ),
    responses(
        (status = 200, description = "ZIP bundle of generated documents"),
        (status = 400, description = "Invalid input, data file or template", body = ErrorBody),
        (status = 500, description = "Conversion or archival failure", body = ErrorBody)
    )
)]
pub async fn generate(
    query: web::Query<GenerateQuery>,
    payload: Multipart,
    data: web::Data<AppState>,
) -> HttpResponse {
    info!("Executing generate handler");
    match run_pipeline(query.into_inner(), payload, data.converter.as_ref()).await {
        Ok(bundle) => HttpResponse::Ok()
            .content_type("application/zip")
            .insert_header((
                header::CONTENT_DISPOSITION,
                r#"attachment; filename="reports.zip""#,
            ))
            .body(bundle),
        Err(error) => error.into(),
    }
}

/// The sequential pipeline: validate, extract rows, derive names, render
/// per row (converting when requested), archive. The first failure aborts
/// the whole request; no partial bundle is ever returned.
async fn run_pipeline(
    query: GenerateQuery,
    payload: Multipart,
    converter: &dyn DocumentConverter,
) -> Result<Vec<u8>, GenerateError> {
    // Output mode is checked before any file parsing happens.
    let format = match query.output_format.as_deref() {
        None => OutputFormat::default(),
        Some(raw) => OutputFormat::parse(raw).ok_or(GenerateError::InvalidOutputFormat)?,
    };

    let upload = UploadParser::parse(payload).await?;
    let template = upload.template.ok_or(GenerateError::MissingTemplate)?;
    let data_file = upload.data.ok_or(GenerateError::MissingDataFile)?;

    if file_extension(&template.filename) != "docx" {
        return Err(GenerateError::InvalidTemplateExtension);
    }
    let data_ext = file_extension(&data_file.filename);
    if data_ext != "csv" && data_ext != "xlsx" {
        return Err(GenerateError::InvalidDataExtension);
    }

    let data_rows = rows::extract_rows(&data_file.bytes, &data_ext)?;
    let base_names = naming::derive_base_names(&data_rows);

    let mut files: Vec<GeneratedFile> = Vec::with_capacity(data_rows.len() * 2);
    for (index, row) in data_rows.iter().enumerate() {
        let docx =
            render::render_docx(&template.bytes, row).map_err(|e| GenerateError::Template {
                detail: e.to_string(),
                row_index: index + 1,
            })?;

        let base = &base_names[index];
        let pdf = if format.wants_pdf() {
            Some(converter.convert_to_pdf(&docx).await?)
        } else {
            None
        };
        if format.wants_docx() {
            files.push(GeneratedFile {
                name: format!("{base}.docx"),
                bytes: docx,
            });
        }
        if let Some(pdf) = pdf {
            files.push(GeneratedFile {
                name: format!("{base}.pdf"),
                bytes: pdf,
            });
        }
    }

    info!(
        "Generated {} file(s) from {} row(s), output format {}",
        files.len(),
        data_rows.len(),
        format.as_str()
    );

    archive::build_archive(&files).map_err(|e| GenerateError::Archive {
        detail: e.to_string(),
    })
}

fn file_extension(name: &str) -> String {
    name.rsplit('.').next().unwrap_or_default().to_ascii_lowercase()
}
