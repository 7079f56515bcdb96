use crate::form::FormError;
use crate::types::PreviewId;

/// Image the user picked, held in memory until the form is submitted.
#[derive(Clone, PartialEq, Eq)]
pub struct Screenshot {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

// Keep image bytes out of logs.
impl std::fmt::Debug for Screenshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Screenshot")
            .field("filename", &self.filename)
            .field("mime_type", &self.mime_type)
            .field("bytes_len", &self.bytes.len())
            .finish()
    }
}

impl Screenshot {
    /// Builds a screenshot, rejecting anything that is not `image/*`.
    pub fn new(
        filename: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, FormError> {
        let mime_type = mime_type.into();
        if !is_image_mime(&mime_type) {
            return Err(FormError::UnsupportedFileType(mime_type));
        }
        Ok(Self {
            filename: filename.into(),
            mime_type,
            bytes,
        })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

pub fn is_image_mime(mime: &str) -> bool {
    mime.trim()
        .to_ascii_lowercase()
        .strip_prefix("image/")
        .is_some_and(|sub| !sub.is_empty())
}

/// Revocable handle standing in for the selected file while it is displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub id: PreviewId,
    pub url: String,
    pub filename: String,
}

impl Preview {
    pub fn for_screenshot(shot: &Screenshot) -> Self {
        let id = PreviewId::new();
        Self {
            url: format!("preview:{id}"),
            id,
            filename: shot.filename.clone(),
        }
    }
}
