use crate::config::Assets;
use crate::constants::{RESPONSE_MODALITIES, SUBJECT_SEPARATOR};
use crate::error::Result;
use crate::gemini::{Content, GenerateContentRequest, GenerationConfig, InlineData, Part};
use std::{fs, path::Path};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceImage {
    pub mime_type: &'static str,
    pub data: Vec<u8>,
}

/// Reference images in bundle order followed by one composed text prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub references: Vec<ReferenceImage>,
    pub prompt: String,
}

/// Unknown extensions fall back to PNG.
pub fn mime_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/png",
    }
}

pub fn compose_prompt(style: &str, subject: &str) -> String {
    format!("{}{}{}", style.trim(), SUBJECT_SEPARATOR, subject)
}

pub fn build_request(subject: &str, assets: &Assets) -> Result<GenerationRequest> {
    let references = assets
        .reference_images
        .iter()
        .map(|path| -> Result<ReferenceImage> {
            Ok(ReferenceImage {
                mime_type: mime_type_for(path),
                data: fs::read(path)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let style = fs::read_to_string(&assets.style_prompt)?;

    Ok(GenerationRequest {
        references,
        prompt: compose_prompt(&style, subject),
    })
}

impl GenerationRequest {
    pub fn to_wire(&self) -> GenerateContentRequest {
        let mut parts: Vec<Part> = self
            .references
            .iter()
            .map(|reference| Part::InlineData {
                inline_data: InlineData {
                    mime_type: reference.mime_type.to_string(),
                    data: base64::encode(&reference.data),
                },
            })
            .collect();
        parts.push(Part::Text {
            text: self.prompt.clone(),
        });

        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts,
            }],
            generation_config: GenerationConfig {
                response_modalities: RESPONSE_MODALITIES.iter().map(|m| m.to_string()).collect(),
            },
        }
    }
}
