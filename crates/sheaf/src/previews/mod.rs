//! Derives catalog preview images from the first page of a worksheet PDF.
//!
//! Two PNG derivatives are produced per PDF: a small thumbnail for catalog
//! grids and a larger preview for the worksheet card. Rasterization sits
//! behind [`PdfRasterizer`] so the catalog keeps working (minus previews)
//! on hosts without a pdfium library.

mod pdfium;

pub use pdfium::PdfiumRasterizer;

use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use tracing::warn;

/// Catalog grid thumbnail bounds in pixels.
pub const THUMBNAIL_BOUNDS: (u32, u32) = (300, 400);
/// Worksheet card preview bounds in pixels.
pub const PREVIEW_BOUNDS: (u32, u32) = (800, 1000);
/// Raster width for the intermediate page image, roughly 200 DPI on A4.
pub const RASTER_WIDTH: u32 = 1654;

/// Renders the first page of a PDF to a raster image.
pub trait PdfRasterizer: Send + Sync {
    fn first_page(&self, pdf: &[u8], target_width: u32) -> Result<DynamicImage, PreviewError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    #[error("pdf rendering failed: {0}")]
    Render(String),
    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),
}

/// Both derivatives for one PDF, ready to hand to the media store.
pub struct PreviewSet {
    pub thumbnail: Vec<u8>,
    pub preview: Vec<u8>,
}

/// Produces [`PreviewSet`]s, or nothing at all when no rasterizer is
/// available.
pub struct PreviewGenerator {
    rasterizer: Option<Box<dyn PdfRasterizer>>,
}

impl PreviewGenerator {
    pub fn new(rasterizer: Option<Box<dyn PdfRasterizer>>) -> Self {
        Self { rasterizer }
    }

    /// Binds to the system pdfium library, falling back to a disabled
    /// generator with a single warning when the library is missing.
    pub fn with_pdfium() -> Self {
        match PdfiumRasterizer::new() {
            Ok(rasterizer) => Self::new(Some(Box::new(rasterizer))),
            Err(err) => {
                warn!(%err, "pdfium unavailable, preview generation disabled");
                Self::new(None)
            }
        }
    }

    pub fn disabled() -> Self {
        Self::new(None)
    }

    pub fn is_enabled(&self) -> bool {
        self.rasterizer.is_some()
    }

    /// Renders the first page and encodes both derivatives. Returns `None`
    /// when no rasterizer is configured.
    pub fn derive(&self, pdf: &[u8]) -> Result<Option<PreviewSet>, PreviewError> {
        let Some(rasterizer) = self.rasterizer.as_deref() else {
            return Ok(None);
        };
        let page = rasterizer.first_page(pdf, RASTER_WIDTH)?;
        Ok(Some(PreviewSet {
            thumbnail: encode_fit(&page, THUMBNAIL_BOUNDS)?,
            preview: encode_fit(&page, PREVIEW_BOUNDS)?,
        }))
    }
}

/// Aspect-preserving resize into the given bounds, encoded as PNG.
fn encode_fit(page: &DynamicImage, bounds: (u32, u32)) -> Result<Vec<u8>, PreviewError> {
    let resized = page.resize(bounds.0, bounds.1, FilterType::Lanczos3);
    let mut buffer = Cursor::new(Vec::new());
    resized.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(buffer.into_inner())
}
