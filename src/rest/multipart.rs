//! Multipart file uploads.
//!
//! [`convert_to_multipart_encoded_files`] turns `(field, path, mime)` triples
//! into [`MultipartFile`] descriptors. A descriptor only remembers the path:
//! the file itself is opened, read and closed by [`build_form`] while the
//! request that uploads it is being assembled, so no handle outlives a request.

use crate::error::{KeywordError, Result};
use crate::executor::RequestError;
use reqwest::blocking::multipart::{Form, Part};
use std::fs;
use std::path::{Path, PathBuf};

/// One file field of a multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartFile {
    /// Form field name.
    pub field_name: String,
    /// File name announced to the server (basename of `path`).
    pub file_name: String,
    /// Location of the file on disk.
    pub path: PathBuf,
    /// Declared mime type.
    pub mime_type: String,
}

/// Converts `(field_name, file_path, mime_type)` triples into multipart file
/// descriptors, preserving order.
///
/// # Errors
///
/// Returns `KeywordError::NotFound` when a path does not name a regular file.
///
/// # Examples
///
/// ```no_run
/// use http_keywords::rest::multipart::convert_to_multipart_encoded_files;
///
/// let files = convert_to_multipart_encoded_files(&[("file", "/tmp/a.txt", "text/plain")]).unwrap();
/// assert_eq!(files[0].file_name, "a.txt");
/// ```
pub fn convert_to_multipart_encoded_files<F, P, M>(files: &[(F, P, M)]) -> Result<Vec<MultipartFile>>
where
    F: AsRef<str>,
    P: AsRef<Path>,
    M: AsRef<str>,
{
    files
        .iter()
        .map(|(field, path, mime)| {
            let path = path.as_ref();
            if !path.is_file() {
                return Err(KeywordError::NotFound(format!(
                    "File '{}' not found",
                    path.display()
                )));
            }
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            Ok(MultipartFile {
                field_name: field.as_ref().to_string(),
                file_name,
                path: path.to_path_buf(),
                mime_type: mime.as_ref().to_string(),
            })
        })
        .collect()
}

/// Reads every file into a multipart form. Each file is closed as soon as its
/// contents are in memory.
pub(crate) fn build_form(files: &[MultipartFile]) -> std::result::Result<Form, RequestError> {
    let mut form = Form::new();
    for file in files {
        let contents = fs::read(&file.path).map_err(|e| {
            RequestError::BuildError(format!("cannot read '{}': {}", file.path.display(), e))
        })?;
        let part = Part::bytes(contents)
            .file_name(file.file_name.clone())
            .mime_str(&file.mime_type)?;
        form = form.part(file.field_name.clone(), part);
    }
    Ok(form)
}
