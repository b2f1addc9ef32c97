//! Flag image decoding for the info panel.

const FLAG_MAX_DIMENSION: u32 = 320;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreviewImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

/// Decodes PNG/JPEG bytes, shrinking anything larger than the flag slot.
pub fn decode_preview_image(bytes: &[u8]) -> Result<PreviewImage, String> {
    let dynamic =
        image::load_from_memory(bytes).map_err(|err| format!("failed to decode flag image: {err}"))?;
    let resized = if dynamic.width() > FLAG_MAX_DIMENSION || dynamic.height() > FLAG_MAX_DIMENSION {
        dynamic
            .thumbnail(FLAG_MAX_DIMENSION, FLAG_MAX_DIMENSION)
            .to_rgba8()
    } else {
        dynamic.to_rgba8()
    };
    Ok(PreviewImage {
        width: resized.width() as usize,
        height: resized.height() as usize,
        rgba: resized.into_raw(),
    })
}
