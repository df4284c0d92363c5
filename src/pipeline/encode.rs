//! Image encoding: `DynamicImage` → PNG bytes, optionally base64-wrapped.
//!
//! Both OCR backends consume PNG: tesseract reads it from a file or memory,
//! and vision LLM APIs accept it as a base64 data payload. PNG is lossless,
//! so glyph edges survive intact; JPEG artefacts around small text measurably
//! hurt recognition.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use edgequake_llm::ImageData;
use image::DynamicImage;
use std::io::Cursor;
use tracing::debug;

/// Encode a bitmap as PNG.
pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;
    debug!(
        "Encoded {}x{} image → {} PNG bytes",
        img.width(),
        img.height(),
        buf.len()
    );
    Ok(buf)
}

/// Encode a bitmap as a base64 PNG ready for a vision LLM.
///
/// `detail: "high"` asks OpenAI-style APIs for the full tile budget; the
/// low-detail mode downsamples to a single 512 px tile and loses small print.
pub fn encode_for_vision(img: &DynamicImage) -> Result<ImageData, image::ImageError> {
    let b64 = STANDARD.encode(encode_png(img)?);
    Ok(ImageData::new(b64, "image/png").with_detail("high"))
}
