use crate::background::MatteKind;
use crate::constants::{ASPECT_RATIOS, DEFAULT_OUTPUT};
use crate::error::Result;
use crate::output::OutputSpec;
use crate::postprocess::AspectRatio;
use clap::Parser;
use std::path::PathBuf;

const EXAMPLES: &str = "\
Examples:
  # Generate a game icon
  iconsmith --prompt \"a shotgun\" --output shotgun.png

  # Generate multiple variations
  iconsmith --prompt \"a shield\" --output shield.png --num-images 3

  # Square icon with the background removed
  iconsmith -p \"a beer mug\" -o icons/beer.png -a 1:1 -t";

#[derive(Debug, Parser)]
#[command(
    name = "iconsmith",
    version,
    about = "Generate on-style game icons with the Gemini image API.",
    after_help = EXAMPLES
)]
pub struct Cli {
    /// Text prompt describing the desired image.
    #[arg(short, long)]
    pub prompt: String,

    /// Output path for the generated image.
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Aspect ratio the generated image is center-cropped to.
    #[arg(short, long, value_parser = ASPECT_RATIOS)]
    pub aspect_ratio: Option<String>,

    /// Number of images to generate.
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub num_images: u32,

    /// Remove the background after generation. Output is saved as RGBA PNG.
    #[arg(short, long)]
    pub transparent: bool,

    /// Background removal method used with --transparent.
    #[arg(long, value_enum, default_value_t = MatteKind::Model)]
    pub matte: MatteKind,
}

/// `--help` and `--version` exit cleanly, every parse failure exits 1.
pub fn parse_exit_code(error: &clap::Error) -> i32 {
    if error.use_stderr() {
        1
    } else {
        0
    }
}

impl Cli {
    pub fn output_spec(&self) -> Result<OutputSpec> {
        let aspect_ratio = self
            .aspect_ratio
            .as_deref()
            .map(str::parse::<AspectRatio>)
            .transpose()?;

        Ok(OutputSpec {
            base_path: self.output.clone(),
            aspect_ratio,
            num_images: self.num_images,
            transparent: self.transparent,
        })
    }
}
