use crate::error::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::Luma;
use qrcode::QrCode;
use std::io::Cursor;

/// Renders arbitrary text as a QR code and returns it as a base64-encoded
/// PNG.
pub fn encode_png_base64(text: &str) -> Result<String> {
    let code = QrCode::new(text.as_bytes())
        .map_err(|e| Error::Internal(format!("QR encoding failed: {}", e)))?;
    let img = code.render::<Luma<u8>>().min_dimensions(300, 300).build();

    let mut buf = Cursor::new(Vec::new());
    image::DynamicImage::ImageLuma8(img)
        .write_to(&mut buf, image::ImageFormat::Png)
        .map_err(|e| Error::Internal(format!("QR PNG render failed: {}", e)))?;

    Ok(STANDARD.encode(buf.into_inner()))
}
