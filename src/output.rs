use crate::constants::DEFAULT_EXTENSION;
use crate::postprocess::AspectRatio;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSpec {
    pub base_path: PathBuf,
    pub aspect_ratio: Option<AspectRatio>,
    /// Number of independent generation calls.
    pub num_images: u32,
    pub transparent: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedImage {
    pub path: PathBuf,
}

/// Where image `image_index` of call `call_index` is written.
///
/// A single-call run keeps `base` for its first image. Every other image is
/// written next to `base` as `<stem>_<call + 1>_<image + 1>.<ext>`, with
/// `.png` standing in when `base` has no extension.
pub fn output_path(base: &Path, call_count: u32, call_index: u32, image_index: u32) -> PathBuf {
    if call_count == 1 && call_index == 0 && image_index == 0 {
        return base.to_path_buf();
    }

    let stem = base
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = base
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
    let file_name = format!(
        "{}_{}_{}.{}",
        stem,
        call_index + 1,
        image_index + 1,
        extension
    );

    match base.parent() {
        Some(parent) => parent.join(file_name),
        None => PathBuf::from(file_name),
    }
}
