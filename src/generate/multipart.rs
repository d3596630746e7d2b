use actix_multipart::Multipart;
use futures_util::StreamExt;
use sanitize_filename::sanitize;

use super::models::{GenerateUpload, UploadedFile};
use super::GenerateError;

/// Total request size cap across all multipart fields.
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

pub struct UploadParser;

impl UploadParser {
    /// Collect the `template` and `data` file fields into memory, enforcing
    /// the total size cap. Unknown fields are ignored.
    pub async fn parse(mut multipart: Multipart) -> Result<GenerateUpload, GenerateError> {
        let mut upload = GenerateUpload::default();
        let mut total_bytes = 0usize;

        while let Some(item) = multipart.next().await {
            let mut field = item.map_err(|e| GenerateError::Multipart(e.to_string()))?;
            let (field_name, filename) = {
                let content_disposition = field.content_disposition().ok_or_else(|| {
                    GenerateError::Multipart("Content disposition not found".to_string())
                })?;
                let name = content_disposition
                    .get_name()
                    .ok_or_else(|| GenerateError::Multipart("Field name not found".to_string()))?
                    .to_string();
                let filename = content_disposition
                    .get_filename()
                    .map(|f| sanitize(f))
                    .unwrap_or_default();
                (name, filename)
            };

            let mut buffer = Vec::new();
            while let Some(chunk) = field.next().await {
                let data_chunk = chunk.map_err(|e| GenerateError::Multipart(e.to_string()))?;
                total_bytes += data_chunk.len();
                if total_bytes > MAX_UPLOAD_BYTES {
                    return Err(GenerateError::PayloadTooLarge);
                }
                buffer.extend_from_slice(&data_chunk);
            }

            match field_name.as_str() {
                "template" => {
                    upload.template = Some(UploadedFile {
                        filename,
                        bytes: buffer,
                    });
                }
                "data" => {
                    upload.data = Some(UploadedFile {
                        filename,
                        bytes: buffer,
                    });
                }
                _ => continue,
            }
        }

        Ok(upload)
    }
}
