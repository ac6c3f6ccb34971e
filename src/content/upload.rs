// Lesson file uploads - plain text only

use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Please upload a .txt file. PDF support coming soon.")]
    UnsupportedType,
    #[error("Failed to read file: {0}")]
    Read(#[from] std::io::Error),
    #[error("Could not read file as text.")]
    NotText,
}

/// True for paths with a `.txt` extension (any case)
pub fn is_text_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
}

/// Read an uploaded lesson file
pub fn load_text_file(path: &Path) -> Result<String, UploadError> {
    if !is_text_file(path) {
        return Err(UploadError::UnsupportedType);
    }
    let bytes = std::fs::read(path)?;
    String::from_utf8(bytes).map_err(|_| UploadError::NotText)
}
