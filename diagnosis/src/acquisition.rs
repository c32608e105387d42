//! Image acquisition: size/type validation, decoding to a displayable
//! preview, and the placeholder frame used by simulated capture.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::{ImageFormat, ImageReader, Rgb, RgbImage};
use std::error::Error;
use std::future::Future;
use std::io::Cursor;
use std::rc::Rc;

use crate::config::DiagnosisConfig;
use crate::error::ValidationError;

const PLACEHOLDER_EDGE: u32 = 224;
const PLACEHOLDER_COLOR: Rgb<u8> = Rgb([76, 140, 74]);

/// A file handed to the acquisition unit, before any bytes are read.
pub trait ImageFile {
    fn name(&self) -> String;
    fn size(&self) -> u64;
    /// Declared MIME type; may be empty when the platform does not know it.
    fn mime_type(&self) -> String;
    fn read(self) -> impl Future<Output = Result<Vec<u8>, Box<dyn Error>>>;
}

/// In-memory file, already fully available.
#[derive(Debug, Clone)]
pub struct RawFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl RawFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }
}

impl ImageFile for RawFile {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    fn mime_type(&self) -> String {
        self.mime_type.clone()
    }

    async fn read(self) -> Result<Vec<u8>, Box<dyn Error>> {
        Ok(self.bytes)
    }
}

/// Binary payload sent to the prediction service.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePayload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Rc<[u8]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadedImage {
    /// Displayable reference: a data URI, or a static path for captures.
    pub preview: String,
    pub payload: ImagePayload,
    pub dimensions: (u32, u32),
}

impl UploadedImage {
    pub fn file_name(&self) -> &str {
        &self.payload.file_name
    }

    pub fn size_bytes(&self) -> u64 {
        self.payload.bytes.len() as u64
    }
}

pub fn check_size(size: u64, max: u64) -> Result<(), ValidationError> {
    if size > max {
        return Err(ValidationError::FileTooLarge { size, max });
    }
    Ok(())
}

pub fn check_type(mime_type: &str) -> Result<(), ValidationError> {
    if mime_type.is_empty() || mime_type.starts_with("image/") {
        Ok(())
    } else {
        Err(ValidationError::UnsupportedType(mime_type.to_string()))
    }
}

/// Sniffs the format, reads the header dimensions and builds the data-URI
/// preview. Pixels are not decoded.
pub fn decode_image(
    file_name: &str,
    declared_mime: &str,
    bytes: Vec<u8>,
    max: u64,
) -> Result<UploadedImage, ValidationError> {
    check_size(bytes.len() as u64, max)?;

    let reader = ImageReader::new(Cursor::new(bytes.as_slice()))
        .with_guessed_format()
        .map_err(|_| ValidationError::UnreadableImage)?;
    let format = reader.format().ok_or(ValidationError::UnreadableImage)?;
    let dimensions = reader.into_dimensions().map_err(|e| {
        log::warn!("Could not read dimensions of {}: {}", file_name, e);
        ValidationError::UnreadableImage
    })?;

    let mime_type = if declared_mime.starts_with("image/") {
        declared_mime.to_string()
    } else {
        format.to_mime_type().to_string()
    };
    let preview = format!("data:{};base64,{}", mime_type, STANDARD.encode(&bytes));

    Ok(UploadedImage {
        preview,
        payload: ImagePayload {
            file_name: file_name.to_string(),
            mime_type,
            bytes: bytes.into(),
        },
        dimensions,
    })
}

/// Fixed frame produced by simulated capture. Stands in for a real camera
/// API, which would add failure modes (permission denial, no device) that
/// this path never produces.
pub fn placeholder_capture(config: &DiagnosisConfig) -> Result<UploadedImage, ValidationError> {
    let frame = RgbImage::from_pixel(PLACEHOLDER_EDGE, PLACEHOLDER_EDGE, PLACEHOLDER_COLOR);
    let mut encoded = Cursor::new(Vec::new());
    frame.write_to(&mut encoded, ImageFormat::Jpeg).map_err(|e| {
        log::error!("Failed to encode placeholder capture: {}", e);
        ValidationError::UnreadableImage
    })?;

    Ok(UploadedImage {
        preview: config.capture.placeholder_preview.clone(),
        payload: ImagePayload {
            file_name: config.capture.file_name.clone(),
            mime_type: "image/jpeg".to_string(),
            bytes: encoded.into_inner().into(),
        },
        dimensions: (PLACEHOLDER_EDGE, PLACEHOLDER_EDGE),
    })
}

/// The session's image slot: the current upload plus the name of the file
/// being read, if any.
#[derive(Debug, Default)]
pub struct ImageSlot {
    current: Option<UploadedImage>,
    pending_name: Option<String>,
}

impl ImageSlot {
    pub fn current(&self) -> Option<&UploadedImage> {
        self.current.as_ref()
    }

    /// Name to show next to the uploader: the file being read, else the
    /// held image's.
    pub fn display_name(&self) -> Option<&str> {
        self.pending_name
            .as_deref()
            .or_else(|| self.current.as_ref().map(UploadedImage::file_name))
    }

    pub(crate) fn begin(&mut self, file_name: String) {
        self.pending_name = Some(file_name);
    }

    pub(crate) fn finish(&mut self, image: Option<UploadedImage>) {
        self.pending_name = None;
        if let Some(image) = image {
            self.current = Some(image);
        }
    }

    pub(crate) fn clear(&mut self) {
        self.current = None;
        self.pending_name = None;
    }
}
