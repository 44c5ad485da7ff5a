/// Multipart body reader shared by the upload endpoints
use actix_multipart::Multipart;
use futures_util::stream::StreamExt;
use std::collections::HashMap;

use crate::error::{AppError, Result};
use crate::services::UploadedFile;

const MAX_TEXT_FIELD_BYTES: usize = 64 * 1024;

/// Text fields and file parts of one multipart body, keyed by field name
#[derive(Debug, Default)]
pub struct MultipartData {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl MultipartData {
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Text value, empty when the field was not sent
    pub fn take_text(&mut self, name: &str) -> String {
        self.fields.remove(name).unwrap_or_default()
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }
}

/// Drain the whole body into memory, enforcing `max_bytes` across all parts
pub async fn read_multipart(mut payload: Multipart, max_bytes: usize) -> Result<MultipartData> {
    let mut data = MultipartData::default();
    let mut total_bytes: usize = 0;

    while let Some(item) = payload.next().await {
        let mut field = item?;

        let name = match field.name() {
            Some(name) => name.to_string(),
            None => continue,
        };
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_owned);
        let content_type = field
            .content_type()
            .map(|mime| mime.essence_str().to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk?;
            total_bytes += chunk.len();
            if total_bytes > max_bytes {
                return Err(AppError::PayloadTooLarge(max_bytes));
            }
            if filename.is_none() && bytes.len() + chunk.len() > MAX_TEXT_FIELD_BYTES {
                return Err(AppError::BadRequest(format!("Field '{}' is too long", name)));
            }
            bytes.extend_from_slice(&chunk);
        }

        match filename {
            // browsers send an empty part for an untouched file input
            Some(filename) if filename.is_empty() && bytes.is_empty() => {}
            Some(filename) => {
                data.files.insert(
                    name,
                    UploadedFile {
                        filename: Some(filename),
                        content_type,
                        bytes,
                    },
                );
            }
            None => {
                let value = String::from_utf8(bytes)
                    .map_err(|_| AppError::BadRequest(format!("Field '{}' is not UTF-8", name)))?;
                data.fields.insert(name, value);
            }
        }
    }

    Ok(data)
}
