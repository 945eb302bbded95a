use crate::constants::ALPHA_EXTENSION;
use crate::error::{Error, Result};
use image::{DynamicImage, ImageFormat};
use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

/// Target `width:height` ratio, both sides positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

impl AspectRatio {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidAspectRatio(format!("{}:{}", width, height)));
        }
        Ok(AspectRatio { width, height })
    }
}

impl FromStr for AspectRatio {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        let invalid = || Error::InvalidAspectRatio(input.to_string());
        let (w, h) = input.split_once(':').ok_or_else(invalid)?;
        let width = w.trim().parse::<u32>().map_err(|_| invalid())?;
        let height = h.trim().parse::<u32>().map_err(|_| invalid())?;
        AspectRatio::new(width, height).map_err(|_| invalid())
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

/// Size of the largest `ratio`-shaped region that fits in `width x height`.
/// Never larger than the source on either axis.
pub fn crop_dimensions(width: u32, height: u32, ratio: AspectRatio) -> (u32, u32) {
    let (w, h) = (u64::from(width), u64::from(height));
    let (wr, hr) = (u64::from(ratio.width), u64::from(ratio.height));
    let target_w = w.min(h * wr / hr);
    let target_h = h.min(w * hr / wr);
    (target_w as u32, target_h as u32)
}

pub fn center_crop(image: &DynamicImage, ratio: AspectRatio) -> DynamicImage {
    let (width, height) = (image.width(), image.height());
    let (target_w, target_h) = crop_dimensions(width, height, ratio);
    if (target_w, target_h) == (width, height) {
        return image.clone();
    }
    let left = (width - target_w) / 2;
    let top = (height - target_h) / 2;
    log::debug!(
        "cropping {}x{} to {} as {}x{} at ({}, {})",
        width,
        height,
        ratio,
        target_w,
        target_h,
        left,
        top
    );
    image.crop_imm(left, top, target_w, target_h)
}

/// Swaps any extension that cannot carry alpha for `.PNG`.
pub fn ensure_alpha_extension(path: &Path) -> PathBuf {
    let keeps_alpha = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("png"));
    if keeps_alpha {
        path.to_path_buf()
    } else {
        path.with_extension(ALPHA_EXTENSION)
    }
}

/// Writes `image` in the format named by the path's extension, PNG when the
/// extension is missing or unknown.
pub fn save_image(image: &DynamicImage, path: &Path) -> Result<()> {
    let format = ImageFormat::from_path(path).unwrap_or(ImageFormat::Png);
    if format == ImageFormat::Jpeg && image.color().has_alpha() {
        DynamicImage::ImageRgb8(image.to_rgb8()).save_with_format(path, format)?;
    } else {
        image.save_with_format(path, format)?;
    }
    Ok(())
}
