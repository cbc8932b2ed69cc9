//! Encoded canvas frames.
//!
//! A [`Frame`] is the PNG encoding of the full canvas at one point in time.
//! Frames travel through the debounce gate to the inference client, usually
//! as a base64 data URI.

use base64::Engine as _;
use image::{ImageEncoder, RgbaImage};

use crate::error::{Result, SketchError};

/// Data-URI prefixes accepted by [`strip_data_uri_prefix`].
const DATA_URI_PREFIXES: [&str; 3] = [
    "data:image/png;base64,",
    "data:image/jpg;base64,",
    "data:image/jpeg;base64,",
];

/// A PNG-encoded snapshot of the whole canvas.
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    png: Vec<u8>,
    width: u32,
    height: u32,
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("png_bytes", &self.png.len())
            .finish()
    }
}

impl Frame {
    /// Encode a raster as a PNG frame.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::Encode`] if the PNG encoder rejects the buffer.
    pub fn encode(raster: &RgbaImage) -> Result<Self> {
        let (width, height) = raster.dimensions();
        let png = encode_rgba_to_png(raster.as_raw(), width, height)?;
        Ok(Self { png, width, height })
    }

    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw base64 payload without any URI prefix.
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.png)
    }

    /// `data:image/png;base64,...` form.
    pub fn to_data_uri(&self) -> String {
        format!("data:image/png;base64,{}", self.to_base64())
    }

    /// Decode the frame back into a raster.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::Encode`] if the PNG data is corrupt.
    pub fn decode(&self) -> Result<RgbaImage> {
        decode_png(&self.png)
    }
}

/// Strip a leading `data:image/(png|jpg|jpeg);base64,` prefix.
///
/// Input without a recognised prefix is returned unchanged.
pub fn strip_data_uri_prefix(encoded: &str) -> &str {
    DATA_URI_PREFIXES
        .iter()
        .find_map(|prefix| encoded.strip_prefix(prefix))
        .unwrap_or(encoded)
}

/// Decode a base64 payload (optionally a data URI) holding a PNG image.
///
/// # Errors
///
/// Returns [`SketchError::Encode`] for invalid base64 or invalid PNG data.
pub fn decode_payload(encoded: &str) -> Result<RgbaImage> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(strip_data_uri_prefix(encoded))
        .map_err(|e| SketchError::Encode(format!("base64 decode: {e}")))?;
    decode_png(&bytes)
}

/// Encode an RGBA pixel buffer to PNG bytes.
fn encode_rgba_to_png(rgba: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut buf);
    encoder
        .write_image(rgba, width, height, image::ExtendedColorType::Rgba8)
        .map_err(|e| SketchError::Encode(format!("PNG encode: {e}")))?;
    Ok(buf)
}

fn decode_png(bytes: &[u8]) -> Result<RgbaImage> {
    image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
        .map(|img| img.to_rgba8())
        .map_err(|e| SketchError::Encode(format!("PNG decode: {e}")))
}
