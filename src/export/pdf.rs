//! Single-page PDF export.
//!
//! Wraps a rendered raster into a one-page PDF whose page box matches the
//! canvas size in points exactly. The raster is placed at the origin and
//! scaled to fill the page: no margins, no extra pages.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, RgbImage};
use printpdf::image::RawImage;
use printpdf::ops::Op;
use printpdf::xobject::{XObject, XObjectTransform};
use printpdf::{Mm, PdfDocument, PdfPage, PdfSaveOptions, Pt, XObjectId};

use crate::error::LaurelError;

/// Produce single-page PDF bytes from a raster.
///
/// `page_width`/`page_height` are in points: the canvas dimensions, not
/// the (possibly quality-multiplied) raster dimensions. The image is scaled
/// back down so higher quality only increases pixel density on the page.
pub fn export_page(
    raster: &RgbImage,
    page_width: f32,
    page_height: f32,
    title: &str,
) -> Result<Vec<u8>, LaurelError> {
    let mut png_bytes = Vec::new();
    DynamicImage::ImageRgb8(raster.clone())
        .write_to(&mut Cursor::new(&mut png_bytes), ImageFormat::Png)
        .map_err(|e| LaurelError::Render(format!("failed to encode page raster: {}", e)))?;

    let mut warnings = Vec::new();
    let mut doc = PdfDocument::new(title);

    let raw_image = RawImage::decode_from_bytes(&png_bytes, &mut warnings)
        .map_err(|e| LaurelError::Render(format!("failed to embed page raster: {}", e)))?;
    let (img_w, img_h) = (raw_image.width as f32, raw_image.height as f32);
    let xobj_id = XObjectId::new();
    doc.resources
        .xobjects
        .map
        .insert(xobj_id.clone(), XObject::Image(raw_image));

    let transform = XObjectTransform {
        translate_x: Some(Pt(0.0)),
        translate_y: Some(Pt(0.0)),
        scale_x: Some(page_width / img_w),
        scale_y: Some(page_height / img_h),
        rotate: None,
        dpi: Some(72.0),
    };
    let ops = vec![Op::UseXobject {
        id: xobj_id,
        transform,
    }];

    let (width_mm, height_mm): (Mm, Mm) = (Pt(page_width).into(), Pt(page_height).into());
    doc.pages.push(PdfPage::new(width_mm, height_mm, ops));

    let mut bytes = Vec::new();
    doc.save_writer(&mut bytes, &PdfSaveOptions::default(), &mut warnings);
    Ok(bytes)
}
