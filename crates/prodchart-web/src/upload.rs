use axum::extract::Multipart;

use crate::error::ApiError;

/// An uploaded file with its data and metadata.
pub struct UploadedFile {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Read the `file` field from a multipart upload. Other fields are drained
/// and ignored; a read error on any field fails the upload.
pub async fn parse_multipart(mut multipart: Multipart) -> Result<UploadedFile, ApiError> {
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            // First `file` field wins; later ones are drained like any other.
            "file" if file.is_none() => {
                let filename = field.file_name().unwrap_or("").to_string();
                let data = field.bytes().await?.to_vec();
                file = Some(UploadedFile { filename, data });
            }
            _ => {
                field.bytes().await?;
            }
        }
    }

    file.ok_or(ApiError::NoFile)
}

/// Extension check only; the content is not sniffed.
pub fn is_pdf_filename(filename: &str) -> bool {
    filename.to_ascii_lowercase().ends_with(".pdf")
}
