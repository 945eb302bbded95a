use crate::constants::{ASSETS_DIR, MATTE_MODEL};
use crate::error::{Error, Result};
use clap::ValueEnum;
use image::{imageops::FilterType, DynamicImage, GrayImage, Luma, Rgba, RgbaImage};
use ndarray::Array4;
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::{collections::VecDeque, path::Path};

/// Turns an image into one with an alpha channel where everything outside the
/// subject is transparent.
pub trait BackgroundRemover {
    fn remove_background(&self, image: &DynamicImage) -> Result<DynamicImage>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MatteKind {
    /// Salient-object segmentation with the bundled u2net ONNX model.
    Model,
    /// Colour-key the backdrop reachable from the image border. Needs no
    /// model, but erases subjects that touch the edges.
    Border,
}

/// Builds the remover for `kind`, loading the model from `<dir>/assets`.
pub fn load_remover(kind: MatteKind, dir: &Path) -> Result<Box<dyn BackgroundRemover>> {
    match kind {
        MatteKind::Model => Ok(Box::new(SegmentationMatte::load(
            &dir.join(ASSETS_DIR).join(MATTE_MODEL),
        )?)),
        MatteKind::Border => Ok(Box::new(BorderMatte::default())),
    }
}

const MODEL_SIZE: u32 = 320;
const MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const STD: [f32; 3] = [0.229, 0.224, 0.225];

/// u2net salient-object matte run through onnxruntime.
pub struct SegmentationMatte {
    session: Session,
}

impl SegmentationMatte {
    pub fn load(model_path: &Path) -> Result<Self> {
        if !model_path.is_file() {
            return Err(Error::MissingAsset(model_path.to_path_buf()));
        }
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(model_path)?;
        log::debug!("loaded matte model {}", model_path.display());
        Ok(SegmentationMatte { session })
    }
}

/// Resizes to the model input and normalises with ImageNet statistics after
/// scaling by the brightest channel value.
pub fn input_tensor(image: &DynamicImage) -> Array4<f32> {
    let resized = image
        .resize_exact(MODEL_SIZE, MODEL_SIZE, FilterType::Lanczos3)
        .to_rgb8();
    let peak = resized
        .pixels()
        .flat_map(|p| p.0)
        .max()
        .map_or(1.0, |m| f32::from(m).max(1e-6));

    let size = MODEL_SIZE as usize;
    let mut tensor = Array4::<f32>::zeros((1, 3, size, size));
    for (x, y, pixel) in resized.enumerate_pixels() {
        for c in 0..3 {
            let value = f32::from(pixel.0[c]) / peak;
            tensor[[0, c, y as usize, x as usize]] = (value - MEAN[c]) / STD[c];
        }
    }
    tensor
}

/// Min-max normalises a raw prediction into an 8-bit mask.
pub fn prediction_to_mask(prediction: &[f32], width: u32, height: u32) -> GrayImage {
    let (lo, hi) = prediction
        .iter()
        .fold((f32::MAX, f32::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let range = (hi - lo).max(f32::EPSILON);
    GrayImage::from_fn(width, height, |x, y| {
        let v = prediction[(y * width + x) as usize];
        Luma([(((v - lo) / range) * 255.0).round() as u8])
    })
}

/// Scales `mask` to the image size and uses it as the alpha channel.
pub fn apply_mask(image: &DynamicImage, mask: &GrayImage) -> DynamicImage {
    let mut rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mask = image::imageops::resize(mask, width, height, FilterType::Lanczos3);
    for (x, y, pixel) in rgba.enumerate_pixels_mut() {
        pixel.0[3] = mask.get_pixel(x, y).0[0];
    }
    DynamicImage::ImageRgba8(rgba)
}

impl BackgroundRemover for SegmentationMatte {
    fn remove_background(&self, image: &DynamicImage) -> Result<DynamicImage> {
        let input = input_tensor(image);
        let outputs = self.session.run(ort::inputs![input.view()]?)?;
        let prediction = outputs[0].try_extract_tensor::<f32>()?;

        let size = MODEL_SIZE as usize;
        let values: Vec<f32> = prediction.iter().take(size * size).copied().collect();
        if values.len() != size * size {
            return Err(Error::Matte(format!(
                "model returned {} values, expected {}",
                values.len(),
                size * size
            )));
        }

        let mask = prediction_to_mask(&values, MODEL_SIZE, MODEL_SIZE);
        Ok(apply_mask(image, &mask))
    }
}

/// Keys out the backdrop colour by flood-filling inward from the image border.
///
/// The key is the per-channel median of the border pixels. A pixel is cleared
/// when it is reachable from the border through pixels whose largest channel
/// difference from the key is at most `tolerance`. Enclosed regions of the
/// same colour stay opaque. Subjects that reach the border are cleared too.
#[derive(Debug, Clone, Copy)]
pub struct BorderMatte {
    pub tolerance: u8,
}

impl Default for BorderMatte {
    fn default() -> Self {
        BorderMatte { tolerance: 24 }
    }
}

impl BorderMatte {
    fn matches(&self, pixel: &Rgba<u8>, key: [u8; 3]) -> bool {
        pixel.0[3] == 0
            || pixel.0[..3]
                .iter()
                .zip(key.iter())
                .all(|(a, b)| a.abs_diff(*b) <= self.tolerance)
    }
}

fn border_coords(width: u32, height: u32) -> impl Iterator<Item = (u32, u32)> {
    let horizontal = (0..width).flat_map(move |x| [(x, 0), (x, height - 1)]);
    let vertical = (1..height.saturating_sub(1)).flat_map(move |y| [(0, y), (width - 1, y)]);
    horizontal.chain(vertical)
}

fn border_key(image: &RgbaImage) -> [u8; 3] {
    let mut channels: [Vec<u8>; 3] = Default::default();
    for (x, y) in border_coords(image.width(), image.height()) {
        let pixel = image.get_pixel(x, y);
        for (c, values) in channels.iter_mut().enumerate() {
            values.push(pixel.0[c]);
        }
    }
    let mut key = [0u8; 3];
    for (c, values) in channels.iter_mut().enumerate() {
        values.sort_unstable();
        key[c] = values[values.len() / 2];
    }
    key
}

impl BackgroundRemover for BorderMatte {
    fn remove_background(&self, image: &DynamicImage) -> Result<DynamicImage> {
        let mut rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        if width == 0 || height == 0 {
            return Ok(DynamicImage::ImageRgba8(rgba));
        }

        let key = border_key(&rgba);
        let mut visited = vec![false; width as usize * height as usize];
        let mut queue = VecDeque::new();
        for (x, y) in border_coords(width, height) {
            let idx = (y * width + x) as usize;
            if !visited[idx] && self.matches(rgba.get_pixel(x, y), key) {
                visited[idx] = true;
                queue.push_back((x, y));
            }
        }

        let mut cleared = 0usize;
        while let Some((x, y)) = queue.pop_front() {
            rgba.get_pixel_mut(x, y).0[3] = 0;
            cleared += 1;

            let neighbours = [
                (x.wrapping_sub(1), y),
                (x + 1, y),
                (x, y.wrapping_sub(1)),
                (x, y + 1),
            ];
            for (nx, ny) in neighbours {
                if nx >= width || ny >= height {
                    continue;
                }
                let idx = (ny * width + nx) as usize;
                if !visited[idx] && self.matches(rgba.get_pixel(nx, ny), key) {
                    visited[idx] = true;
                    queue.push_back((nx, ny));
                }
            }
        }

        log::debug!(
            "background key {:?} cleared {} of {} pixels",
            key,
            cleared,
            width as usize * height as usize
        );
        Ok(DynamicImage::ImageRgba8(rgba))
    }
}
