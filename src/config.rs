use crate::constants::{
    API_KEY_VARS, ASSETS_DIR, ENV_FILE, REFERENCE_IMAGES, STYLE_PROMPT, TOOL_HOME_VAR,
};
use crate::error::{Error, Result};
use std::{
    env,
    path::{Path, PathBuf},
};

/// Directory the tool ships from: holds the `.env` file and the `assets/` folder.
pub fn tool_dir() -> Result<PathBuf> {
    if let Some(home) = env::var_os(TOOL_HOME_VAR).filter(|home| !home.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    let exe = env::current_exe()?;
    Ok(exe
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(".")))
}

/// Loads `<dir>/.env` into the process environment without overwriting
/// variables that are already set. Returns whether a file was loaded.
pub fn seed_env(dir: &Path) -> bool {
    let path = dir.join(ENV_FILE);
    if !path.is_file() {
        return false;
    }
    match dotenv::from_path(&path) {
        Ok(()) => {
            log::debug!("seeded environment from {}", path.display());
            true
        }
        Err(e) => {
            log::warn!("ignoring unreadable {}: {}", path.display(), e);
            false
        }
    }
}

pub fn resolve_api_key<F>(lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    API_KEY_VARS
        .iter()
        .find_map(|name| lookup(name).filter(|value| !value.is_empty()))
        .ok_or(Error::MissingCredential)
}

pub fn env_lookup(name: &str) -> Option<String> {
    env::var(name).ok()
}

#[derive(Debug, Clone)]
pub struct Assets {
    pub reference_images: Vec<PathBuf>,
    pub style_prompt: PathBuf,
}

impl Assets {
    /// Resolves the bundled reference images and style document under
    /// `<dir>/assets`, failing on the first one that does not exist.
    pub fn resolve(dir: &Path) -> Result<Self> {
        let assets_dir = dir.join(ASSETS_DIR);
        let reference_images = REFERENCE_IMAGES
            .iter()
            .map(|name| existing(assets_dir.join(name)))
            .collect::<Result<Vec<_>>>()?;
        let style_prompt = existing(assets_dir.join(STYLE_PROMPT))?;

        Ok(Assets {
            reference_images,
            style_prompt,
        })
    }
}

fn existing(path: PathBuf) -> Result<PathBuf> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(Error::MissingAsset(path))
    }
}
