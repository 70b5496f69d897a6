//! Image service - serves stored event images behind signed links

use std::path::Path;

use tracing::instrument;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Raw image ready to be written to a response
#[derive(Debug, Clone)]
pub struct ImageContent {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}

/// Image service
pub struct ImageService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ImageService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Return the image if `signature` is a live link for `name`
    #[instrument(skip(self, signature))]
    pub async fn serve(&self, name: &str, signature: &str) -> ServiceResult<ImageContent> {
        self.ctx.object_store().verify(name, signature)?;
        let bytes = self.ctx.object_store().get(name).await?;

        Ok(ImageContent {
            bytes,
            content_type: content_type_for(name),
        })
    }
}

fn content_type_for(name: &str) -> &'static str {
    let extension = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("a.jpg"), "image/jpeg");
        assert_eq!(content_type_for("a.JPEG"), "image/jpeg");
        assert_eq!(content_type_for("a.png"), "image/png");
        assert_eq!(content_type_for("a.bin"), "application/octet-stream");
        assert_eq!(content_type_for("noext"), "application/octet-stream");
    }
}
