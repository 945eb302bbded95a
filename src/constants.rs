pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const GEMINI_IMAGE_MODEL: &str = "gemini-3-pro-image-preview";
pub const API_BASE_VAR: &str = "GEMINI_API_BASE";

/// Checked in order; the first non-empty value wins.
pub const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "GENAI_API_KEY"];

pub const TOOL_HOME_VAR: &str = "ICONSMITH_HOME";
pub const ENV_FILE: &str = ".env";
pub const ASSETS_DIR: &str = "assets";

pub const REFERENCE_IMAGES: [&str; 5] = [
    "T_Passive_BlastAmplifier.PNG",
    "T_Passive_ChanceToHealOnCritKill.PNG",
    "T_Passive_InfiniteBeerRange.PNG",
    "T_Passive_LvlUpHPRegen.PNG",
    "T_Passive_MaxHealth_Ballistic.PNG",
];
pub const STYLE_PROMPT: &str = "Game-icon-prompt.md";
pub const MATTE_MODEL: &str = "u2net.onnx";
pub const SUBJECT_SEPARATOR: &str = "\n\nSubject: ";

pub const ASPECT_RATIOS: [&str; 5] = ["1:1", "16:9", "9:16", "4:3", "3:4"];
pub const DEFAULT_OUTPUT: &str = "output.png";
pub const DEFAULT_EXTENSION: &str = "png";
pub const ALPHA_EXTENSION: &str = "PNG";

pub const RESPONSE_MODALITIES: [&str; 2] = ["TEXT", "IMAGE"];
