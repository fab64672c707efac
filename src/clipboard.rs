//! Clipboard image access.
//!
//! [`ClipboardSource`] abstracts the clipboard so the driver can be tested
//! without a display server; [`SystemClipboard`] is the real implementation
//! backed by `arboard`. The clipboard hands out an RGBA bitmap, which is
//! encoded to PNG before upload.

use log::debug;

#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("no image in clipboard")]
    NoImage,
    #[error("clipboard access error: {0}")]
    Access(String),
    #[error("failed to encode clipboard image: {0}")]
    Encode(String),
}

/// Something that can produce encoded image bytes from a clipboard.
pub trait ClipboardSource {
    /// Return the clipboard image as PNG bytes, or [`ClipboardError::NoImage`]
    /// when the clipboard holds something else.
    fn read_image(&self) -> Result<Vec<u8>, ClipboardError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl ClipboardSource for SystemClipboard {
    fn read_image(&self) -> Result<Vec<u8>, ClipboardError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| ClipboardError::Access(e.to_string()))?;

        let image = match clipboard.get_image() {
            Ok(image) => image,
            Err(arboard::Error::ContentNotAvailable) => return Err(ClipboardError::NoImage),
            Err(e) => return Err(ClipboardError::Access(e.to_string())),
        };
        debug!("clipboard image {}x{}", image.width, image.height);
        encode_png(image.width, image.height, image.bytes.into_owned())
    }
}

fn encode_png(width: usize, height: usize, rgba: Vec<u8>) -> Result<Vec<u8>, ClipboardError> {
    use image::{ImageBuffer, ImageFormat, Rgba};

    let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
        ImageBuffer::from_raw(width as u32, height as u32, rgba)
            .ok_or_else(|| ClipboardError::Encode("invalid image dimensions".into()))?;

    let mut cursor = std::io::Cursor::new(Vec::new());
    img.write_to(&mut cursor, ImageFormat::Png)
        .map_err(|e| ClipboardError::Encode(e.to_string()))?;
    Ok(cursor.into_inner())
}
