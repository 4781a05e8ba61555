use image::DynamicImage;
use pdfium_render::prelude::*;

use super::{PdfRasterizer, PreviewError};

/// Rasterizer backed by the system pdfium library.
///
/// Bindings are re-established per render call; pdfium handles are not
/// `Sync` and renders are infrequent enough that rebinding is cheap.
pub struct PdfiumRasterizer;

impl PdfiumRasterizer {
    /// Probes the system library so a missing pdfium surfaces at startup
    /// rather than on the first upload.
    pub fn new() -> Result<Self, PreviewError> {
        Pdfium::bind_to_system_library().map_err(|err| PreviewError::Render(err.to_string()))?;
        Ok(Self)
    }
}

impl PdfRasterizer for PdfiumRasterizer {
    fn first_page(&self, pdf: &[u8], target_width: u32) -> Result<DynamicImage, PreviewError> {
        let bindings = Pdfium::bind_to_system_library()
            .map_err(|err| PreviewError::Render(err.to_string()))?;
        let pdfium = Pdfium::new(bindings);

        let document = pdfium
            .load_pdf_from_byte_slice(pdf, None)
            .map_err(|err| PreviewError::Render(err.to_string()))?;
        let page = document
            .pages()
            .first()
            .map_err(|err| PreviewError::Render(err.to_string()))?;

        let config = PdfRenderConfig::new().set_target_width(target_width as i32);
        let bitmap = page
            .render_with_config(&config)
            .map_err(|err| PreviewError::Render(err.to_string()))?;

        Ok(bitmap.as_image())
    }
}
