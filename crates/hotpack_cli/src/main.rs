mod args;

use std::path::Path;

use ansi_term::Colour;
use anyhow::Context;
use args::ServerArgs;
use clap::Parser;
use hotpack::{DevOptions, DevServer};
use sugar_path::SugarPath;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Commands {
  #[clap(flatten)]
  server: ServerArgs,
}

fn read_config(file: &Path) -> anyhow::Result<DevOptions> {
  let content =
    std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;
  serde_json::from_str(&content).with_context(|| format!("Invalid config file {}", file.display()))
}

fn dev_options(args: ServerArgs) -> anyhow::Result<DevOptions> {
  let from_flags = DevOptions {
    root: args.root,
    host: args.host,
    port: args.port,
    debounce_ms: args.debounce_ms,
    fs_allow: (!args.fs_allow.is_empty()).then_some(args.fs_allow),
    ..Default::default()
  };
  let Some(config) = args.config else {
    return Ok(from_flags);
  };

  // Relative to the working directory, not to the root.
  let config = config.absolutize();
  let from_file = read_config(&config)?;
  Ok(from_flags.merge(DevOptions { config_file: Some(config), ..from_file }))
}

#[tokio::main]
async fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "hotpack=info,tower_http=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let args = Commands::parse();
  let result = match dev_options(args.server) {
    Ok(options) => DevServer::new(options, Vec::new()).listen().await,
    Err(err) => Err(err),
  };

  if let Err(err) = result {
    eprintln!("{} {err:#}", Colour::Red.paint("Error:"));
    std::process::exit(1);
  }
}
