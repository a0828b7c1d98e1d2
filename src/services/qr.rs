//! QR code generation. Each document gets a QR encoding the URL of its
//! detail view; scanning clients extract the document id from the URL path.

use crate::error::AppError;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::{codecs::png::PngEncoder, ExtendedColorType, ImageEncoder, Luma};
use qrcode::QrCode;

/// The URL a printed code points at.
pub fn detail_url(base_url: &str, document_id: &str) -> String {
    format!("{}/documents/{}", base_url.trim_end_matches('/'), document_id)
}

/// Renders the document's QR code as a PNG data URL, suitable for an
/// `<img src>` attribute or direct printing.
pub fn generate_data_url(base_url: &str, document_id: &str) -> Result<String, AppError> {
    let url = detail_url(base_url, document_id);

    let code = QrCode::new(url.as_bytes())
        .map_err(|e| AppError::Internal(format!("QR encoding failed: {}", e)))?;

    let image = code.render::<Luma<u8>>().min_dimensions(256, 256).build();

    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::L8,
        )
        .map_err(|e| AppError::Internal(format!("QR image encoding failed: {}", e)))?;

    Ok(format!("data:image/png;base64,{}", BASE64.encode(&png)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_url_embeds_the_document_id() {
        assert_eq!(
            detail_url("http://localhost:3000", "abc-123"),
            "http://localhost:3000/documents/abc-123"
        );
        // A trailing slash on the base URL does not double up.
        assert_eq!(
            detail_url("https://notary.example/", "abc"),
            "https://notary.example/documents/abc"
        );
    }

    #[test]
    fn generates_a_png_data_url() {
        let data_url =
            generate_data_url("http://localhost:3000", "0192aa00-0000-7000-8000-000000000000")
                .unwrap();
        assert!(data_url.starts_with("data:image/png;base64,"));
        assert!(data_url.len() > "data:image/png;base64,".len());
    }
}
