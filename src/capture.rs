//! Per-variant capture
//!
//! For every variant, in job order: size the viewport, work out the clip
//! rectangle, take the screenshot. Images are staged in memory and only
//! written once the whole job has been captured, so a failing variant leaves
//! no partial set of files behind.

use crate::job::{CaptureRegion, ExportJob};
use crate::variant::{Encoding, Variant};
use crate::{Error, Result};
use log::{debug, warn};
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

/// Viewport size and pixel density applied before a capture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportMetrics {
    pub width: u32,
    pub height: u32,
    pub device_scale_factor: f64,
}

impl From<&Variant> for ViewportMetrics {
    fn from(v: &Variant) -> Self {
        Self {
            width: v.width,
            height: v.height,
            device_scale_factor: v.device_scale_factor,
        }
    }
}

/// Rendered bounding box of an element, as reported by the page
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ElementBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Region of the page copied into the image, in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ClipRect {
    /// Origin clamped to the document, size rounded up to whole pixels.
    pub fn from_element(b: &ElementBox) -> Self {
        Self {
            x: b.x.max(0.0),
            y: b.y.max(0.0),
            width: b.width.ceil(),
            height: b.height.ceil(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Parameters of one screenshot
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenshotRequest {
    pub encoding: Encoding,
    /// Only present for jpeg
    pub quality: Option<u8>,
    /// `None` captures the whole viewport
    pub clip: Option<ClipRect>,
    /// Render content outside the visual viewport so large clips come out whole
    pub capture_beyond_viewport: bool,
}

impl ScreenshotRequest {
    pub fn for_variant(variant: &Variant, clip: Option<ClipRect>) -> Self {
        Self {
            encoding: variant.encoding,
            quality: variant
                .encoding
                .uses_quality()
                .then_some(variant.quality)
                .flatten(),
            clip,
            capture_beyond_viewport: true,
        }
    }
}

/// A page the capture engine can drive.
///
/// The CDP page implements this; tests substitute an in-memory surface.
pub trait CaptureSurface {
    /// Resize the viewport and set the device scale factor.
    fn set_viewport(&self, metrics: &ViewportMetrics) -> Result<()>;

    /// Bounding box of the first element matching `selector`, or `None` if nothing matches.
    fn element_box(&self, selector: &str) -> Result<Option<ElementBox>>;

    /// Encoded image bytes.
    fn screenshot(&self, request: &ScreenshotRequest) -> Result<Vec<u8>>;
}

/// An encoded image waiting to be written
#[derive(Debug, Clone)]
pub struct CapturedImage {
    pub variant: String,
    pub path: PathBuf,
    pub data: Vec<u8>,
}

/// A written output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedImage {
    pub variant: String,
    pub path: PathBuf,
}

impl fmt::Display for ExportedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] Saved image -> {}", self.variant, self.path.display())
    }
}

/// Resolve the clip for `variant` on an already sized viewport.
pub fn resolve_clip<S>(
    surface: &S,
    region: &CaptureRegion,
    variant: &Variant,
) -> Result<Option<ClipRect>>
where
    S: CaptureSurface + ?Sized,
{
    let selector = match region {
        CaptureRegion::Viewport => return Ok(None),
        CaptureRegion::Selector(selector) => selector,
    };

    let element = surface
        .element_box(selector)?
        .ok_or_else(|| Error::SelectorNotFound {
            selector: selector.clone(),
            variant: variant.name.clone(),
        })?;
    let clip = ClipRect::from_element(&element);
    if clip.is_empty() {
        return Err(Error::ZeroSizedRegion {
            selector: selector.clone(),
            variant: variant.name.clone(),
        });
    }
    Ok(Some(clip))
}

/// Capture every variant of `job`, strictly in order. Stops at the first failure.
pub fn capture_all<S>(surface: &S, job: &ExportJob) -> Result<Vec<CapturedImage>>
where
    S: CaptureSurface + ?Sized,
{
    let mut captured = Vec::with_capacity(job.variants.len());
    for (index, variant) in job.variants.iter().enumerate() {
        surface.set_viewport(&ViewportMetrics::from(variant))?;
        let clip = resolve_clip(surface, &job.capture_region, variant)?;
        debug!("[{}] clip {:?}", variant.name, clip);

        let data = surface.screenshot(&ScreenshotRequest::for_variant(variant, clip))?;
        captured.push(CapturedImage {
            variant: variant.name.clone(),
            path: job.output_path(index),
            data,
        });
    }
    Ok(captured)
}

/// Write staged images, overwriting existing files.
///
/// If any write fails, the files already written by this call are removed
/// before the error is returned.
pub fn write_all(images: Vec<CapturedImage>) -> Result<Vec<ExportedImage>> {
    let mut written: Vec<ExportedImage> = Vec::with_capacity(images.len());
    for image in images {
        if let Err(e) = std::fs::write(&image.path, &image.data) {
            for done in &written {
                if let Err(err) = std::fs::remove_file(&done.path) {
                    warn!("could not remove {}: {}", done.path.display(), err);
                }
            }
            return Err(Error::io(&image.path, e));
        }
        debug!("wrote {} bytes to {}", image.data.len(), image.path.display());
        written.push(ExportedImage {
            variant: image.variant,
            path: image.path,
        });
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::{VariantDefaults, VariantSpec};

    #[test]
    fn clip_clamps_origin_and_rounds_size_up() {
        let clip = ClipRect::from_element(&ElementBox {
            x: -4.5,
            y: 12.25,
            width: 800.1,
            height: 599.0,
        });
        assert_eq!(clip, ClipRect { x: 0.0, y: 12.25, width: 801.0, height: 599.0 });
        assert!(!clip.is_empty());
    }

    #[test]
    fn sub_pixel_box_is_not_empty() {
        let clip = ClipRect::from_element(&ElementBox { x: 0.0, y: 0.0, width: 0.2, height: 3.0 });
        assert_eq!(clip.width, 1.0);
        assert!(!clip.is_empty());
    }

    #[test]
    fn png_requests_carry_no_quality() {
        let defaults = VariantDefaults::default();
        let jpeg = "a:10x10,quality=300".parse::<VariantSpec>().unwrap().resolve(&defaults);
        let png = "b:10x10,type=png,quality=30".parse::<VariantSpec>().unwrap().resolve(&defaults);

        let req = ScreenshotRequest::for_variant(&jpeg, None);
        assert_eq!(req.quality, Some(100));
        assert!(req.capture_beyond_viewport);
        assert_eq!(ScreenshotRequest::for_variant(&png, None).quality, None);
    }

    #[test]
    fn report_line() {
        let image = ExportedImage {
            variant: "standard".into(),
            path: PathBuf::from("/out/deck.jpg"),
        };
        assert_eq!(image.to_string(), "[standard] Saved image -> /out/deck.jpg");
    }
}
