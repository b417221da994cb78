use std::io::Cursor;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use arboard::{Clipboard as ArboardClipboard, Error as ArboardError};
use base64::{Engine as _, engine::general_purpose::STANDARD_NO_PAD as Base64NoPad};
use image::{ImageFormat, RgbaImage};
use tracing::{debug, warn};

/// Retries after the first failed attempt to open the clipboard.
pub const MAX_OPEN_RETRIES: u32 = 3;
const BASE_DELAY_MS: u64 = 2_000;
const MAX_DELAY_MS: u64 = 30_000;

/// Content currently on the system clipboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardContent {
    /// Plain text.
    Text(String),
    /// RGBA image data.
    Image {
        /// Width in pixels.
        width: usize,
        /// Height in pixels.
        height: usize,
        /// Raw pixel bytes.
        bytes: Vec<u8>,
    },
}

impl ClipboardContent {
    /// Text fed to the preview: the text itself, or the image as base64 PNG.
    ///
    /// # Errors
    /// Fails when the pixel buffer does not match the image size.
    pub fn preview_source(&self) -> Result<String> {
        match self {
            Self::Text(text) => Ok(text.clone()),
            Self::Image { width, height, bytes } => {
                let png = encode_png(*width, *height, bytes)?;
                Ok(Base64NoPad.encode(png))
            }
        }
    }

    /// Whether the content is an image.
    pub const fn is_image(&self) -> bool {
        matches!(self, Self::Image { .. })
    }
}

fn encode_png(width: usize, height: usize, bytes: &[u8]) -> Result<Vec<u8>> {
    let image = u32::try_from(width)
        .ok()
        .zip(u32::try_from(height).ok())
        .and_then(|(width, height)| RgbaImage::from_raw(width, height, bytes.to_vec()))
        .ok_or_else(|| anyhow!("clipboard image of {width}x{height} has {} bytes", bytes.len()))?;
    let mut png = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .context("failed to encode the clipboard image as PNG")?;
    Ok(png)
}

pub trait ClipboardSource {
    /// Read the clipboard. `None` when it holds nothing readable.
    fn read(&mut self) -> Result<Option<ClipboardContent>>;
}

struct SystemClipboard {
    inner: ArboardClipboard,
}

impl SystemClipboard {
    fn open() -> Result<Self> {
        let inner = open_with_retry(ArboardClipboard::new, thread::sleep)
            .context("failed to open the system clipboard")?;
        Ok(Self { inner })
    }
}

impl ClipboardSource for SystemClipboard {
    fn read(&mut self) -> Result<Option<ClipboardContent>> {
        match self.inner.get_text() {
            Ok(text) => return Ok(Some(ClipboardContent::Text(text))),
            Err(ArboardError::ContentNotAvailable) => debug!("clipboard holds no text"),
            Err(err) => return Err(err).context("failed to read text from the clipboard"),
        }
        match self.inner.get_image() {
            Ok(image) => Ok(Some(ClipboardContent::Image {
                width: image.width,
                height: image.height,
                bytes: image.bytes.into_owned(),
            })),
            Err(ArboardError::ContentNotAvailable) => Ok(None),
            Err(err) => Err(err).context("failed to read an image from the clipboard"),
        }
    }
}

/// Connect to the system clipboard.
pub fn system_clipboard() -> Result<Box<dyn ClipboardSource>> {
    Ok(Box::new(SystemClipboard::open()?))
}

/// Delay before retry number `attempt` (zero based): doubling from two
/// seconds, capped at thirty.
pub fn retry_delay(attempt: u32) -> Duration {
    let factor = 1_u64.checked_shl(attempt).unwrap_or(u64::MAX);
    Duration::from_millis(BASE_DELAY_MS.saturating_mul(factor).min(MAX_DELAY_MS))
}

/// Call `open` until it succeeds or [`MAX_OPEN_RETRIES`] retries failed.
pub fn open_with_retry<T, E>(
    mut open: impl FnMut() -> Result<T, E>,
    mut sleep: impl FnMut(Duration),
) -> Result<T, E>
where
    E: std::fmt::Display,
{
    let mut attempt = 0;
    loop {
        match open() {
            Ok(value) => return Ok(value),
            Err(err) if attempt >= MAX_OPEN_RETRIES => return Err(err),
            Err(err) => {
                let delay = retry_delay(attempt);
                warn!("clipboard unavailable: {err}. retrying in {}ms", delay.as_millis());
                sleep(delay);
                attempt += 1;
            }
        }
    }
}
