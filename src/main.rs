mod background;
mod cli;
mod client;
mod config;
mod constants;
mod error;
mod gemini;
mod generate;
mod output;
mod postprocess;
mod request;

use crate::background::load_remover;
use crate::cli::{parse_exit_code, Cli};
use crate::client::GeminiClient;
use crate::config::{env_lookup, seed_env, tool_dir};
use crate::error::{Error, Result};
use crate::generate::generate_images;
use clap::Parser;
use colored::Colorize;
use std::path::Path;

fn fail(e: Error) -> ! {
    eprintln!("{} {}", "Error:".red().bold(), e);
    std::process::exit(1);
}

#[tokio::main]
async fn main() {
    env_logger::init();

    // ICONSMITH_HOME locates the .env file, so it can only come from the real environment.
    let home = tool_dir().unwrap_or_else(|e| fail(e));
    seed_env(&home);

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(parse_exit_code(&e));
        }
    };

    if let Err(e) = run(cli, &home).await {
        fail(e);
    }
}

async fn run(cli: Cli, home: &Path) -> Result<()> {
    let spec = cli.output_spec()?;
    let remover = if spec.transparent {
        Some(load_remover(cli.matte, home)?)
    } else {
        None
    };
    let http = reqwest::Client::builder().build()?;
    let model = GeminiClient::from_env(http);

    let saved = generate_images(
        &model,
        env_lookup,
        home,
        remover.as_deref(),
        &cli.prompt,
        &spec,
    )
    .await?;

    println!(
        "\nSuccessfully generated {} image(s):",
        saved.len().to_string().bold()
    );
    for image in &saved {
        println!("  - {}", image.path.display());
    }

    Ok(())
}
