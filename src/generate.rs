use crate::background::BackgroundRemover;
use crate::client::{GenerationResponse, ImageModel, ResponsePart};
use crate::config::{resolve_api_key, Assets};
use crate::error::{Error, Result};
use crate::output::{output_path, OutputSpec, SavedImage};
use crate::postprocess::{center_crop, ensure_alpha_extension, save_image};
use crate::request::build_request;
use colored::Colorize;
use std::{fs, path::Path};

/// Runs `spec.num_images` independent generation calls for `subject` and
/// writes every returned image. Images saved by earlier calls stay on disk
/// when a later call fails.
pub async fn generate_images<M, F>(
    model: &M,
    lookup: F,
    tool_dir: &Path,
    remover: Option<&dyn BackgroundRemover>,
    subject: &str,
    spec: &OutputSpec,
) -> Result<Vec<SavedImage>>
where
    M: ImageModel + ?Sized,
    F: Fn(&str) -> Option<String>,
{
    let api_key = resolve_api_key(lookup)?;
    let assets = Assets::resolve(tool_dir)?;
    let request = build_request(subject, &assets)?;
    log::debug!(
        "built request with {} reference image(s)",
        request.references.len()
    );

    if let Some(parent) = spec.base_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut saved = Vec::new();
    for call_index in 0..spec.num_images {
        log::info!("generation call {}/{}", call_index + 1, spec.num_images);
        let response = model.generate(&api_key, &request).await?;
        let response = GenerationResponse::from_api(response)?;
        write_response(response, call_index, spec, remover, &mut saved)?;
    }

    Ok(saved)
}

fn write_response(
    response: GenerationResponse,
    call_index: u32,
    spec: &OutputSpec,
    remover: Option<&dyn BackgroundRemover>,
    saved: &mut Vec<SavedImage>,
) -> Result<()> {
    let mut image_index = 0;
    for part in response.parts {
        match part {
            ResponsePart::Image(bytes) => {
                let mut image = image::load_from_memory(&bytes)?;
                let mut path =
                    output_path(&spec.base_path, spec.num_images, call_index, image_index);

                if let Some(ratio) = spec.aspect_ratio {
                    image = center_crop(&image, ratio);
                }
                if spec.transparent {
                    let remover = remover.ok_or_else(|| {
                        Error::Matte("no background remover configured".into())
                    })?;
                    image = remover.remove_background(&image)?;
                    path = ensure_alpha_extension(&path);
                }

                save_image(&image, &path)?;
                println!("{} {}", "Saved:".green(), path.display());
                saved.push(SavedImage { path });
                image_index += 1;
            }
            ResponsePart::Text(text) => {
                println!("{} {}", "Model response:".cyan(), text);
            }
            ResponsePart::Unrecognized => {
                log::debug!("skipping unrecognized response part");
            }
        }
    }
    Ok(())
}
