use bytes::Bytes;
use tracing::warn;

use crate::errors::AppError;

/// Raw resume content as received from the client.
#[derive(Debug, Clone)]
pub enum ResumeUpload {
    Pdf(Bytes),
    Text(String),
}

/// Converts an upload to plain text. PDF parsing runs on the blocking pool.
pub async fn extract_text(upload: ResumeUpload) -> Result<String, AppError> {
    let text = match upload {
        ResumeUpload::Text(text) => text,
        ResumeUpload::Pdf(bytes) => {
            let parsed = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
                .await
                .map_err(|e| {
                    warn!("PDF extraction task failed: {e}");
                    AppError::Validation("The uploaded PDF could not be read".to_string())
                })?;
            parsed.map_err(|e| AppError::Validation(format!("The uploaded PDF could not be read: {e}")))?
        }
    };

    if text.trim().is_empty() {
        return Err(AppError::Validation(
            "No text could be extracted from the resume".to_string(),
        ));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_plain_text_passes_through() {
        let text = extract_text(ResumeUpload::Text("Skills: Rust".to_string()))
            .await
            .unwrap();
        assert_eq!(text, "Skills: Rust");
    }

    #[tokio::test]
    async fn test_blank_text_rejected() {
        let err = extract_text(ResumeUpload::Text("   \n".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_garbage_pdf_rejected() {
        let err = extract_text(ResumeUpload::Pdf(Bytes::from_static(b"not a pdf")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
