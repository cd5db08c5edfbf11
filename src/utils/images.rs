use std::path::Path;

use clap::ValueEnum;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};

use crate::error::{ItemError, ItemErrorKind};

/// File extensions the resizer picks up (compared case-insensitively)
pub const SUPPORTED_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "tiff", "bmp", "gif"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResizeMode {
    /// Force the exact width and height (may stretch or squash)
    Exact,
    /// Keep the aspect ratio and fit inside the box, never enlarging
    #[value(alias = "fit")]
    FitWithin,
}

/// Check if a file is a supported image based on its extension
pub fn is_supported_image(path: &Path) -> bool {
    match path.extension() {
        Some(extension) => {
            let ext = extension.to_string_lossy().to_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        }
        None => false,
    }
}

/// Output dimensions for a source of size `source` resized into `bounds`
pub fn target_dimensions(source: (u32, u32), bounds: (u32, u32), mode: ResizeMode) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (max_w, max_h) = bounds;

    match mode {
        ResizeMode::Exact => bounds,
        ResizeMode::FitWithin => {
            if src_w == 0 || src_h == 0 || (src_w <= max_w && src_h <= max_h) {
                return source;
            }

            let scale = f64::min(
                max_w as f64 / src_w as f64,
                max_h as f64 / src_h as f64,
            );
            let width = ((src_w as f64 * scale).round() as u32).clamp(1, max_w.max(1));
            let height = ((src_h as f64 * scale).round() as u32).clamp(1, max_h.max(1));
            (width, height)
        }
    }
}

/// Drop alpha so the image can be saved by encoders without alpha support.
/// Paletted sources already decode to RGB(A), so this covers them too.
pub fn flatten_color(img: DynamicImage) -> DynamicImage {
    if !img.color().has_alpha() {
        return img;
    }

    match img {
        DynamicImage::ImageLumaA16(_) | DynamicImage::ImageRgba16(_) => {
            DynamicImage::ImageRgb16(img.to_rgb16())
        }
        DynamicImage::ImageRgba32F(_) => DynamicImage::ImageRgb32F(img.to_rgb32f()),
        _ => DynamicImage::ImageRgb8(img.to_rgb8()),
    }
}

/// Reduce to 8-bit for formats that cannot store deeper samples
fn fit_for_format(img: DynamicImage, format: ImageFormat) -> DynamicImage {
    match format {
        ImageFormat::Png | ImageFormat::Tiff => img,
        _ => match img {
            DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => img,
            other => DynamicImage::ImageRgb8(other.to_rgb8()),
        },
    }
}

/// Resize one image and save it to `target_path`, in the format implied by its extension.
/// Returns the dimensions that were written.
pub fn resize_image(
    source_path: &Path,
    target_path: &Path,
    bounds: (u32, u32),
    mode: ResizeMode,
) -> Result<(u32, u32), ItemError> {
    let format = ImageFormat::from_path(target_path).map_err(|e| {
        ItemError::new(
            ItemErrorKind::Unsupported,
            format!("cannot pick an output format: {}", e),
        )
    })?;

    // Sniff the header so a mislabelled file still decodes
    let img = ImageReader::open(source_path)?
        .with_guessed_format()?
        .decode()?;

    let img = flatten_color(img);
    let (width, height) = target_dimensions(img.dimensions(), bounds, mode);

    let resized = if (width, height) == img.dimensions() {
        img
    } else {
        img.resize_exact(width, height, FilterType::Lanczos3)
    };

    fit_for_format(resized, format).save_with_format(target_path, format)?;

    Ok((width, height))
}
