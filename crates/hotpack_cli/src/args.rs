use std::path::PathBuf;

use clap::Args;

#[derive(Args)]
pub struct ServerArgs {
  /// Directory served as `/`.
  #[clap(long)]
  pub root: Option<PathBuf>,

  #[clap(long)]
  pub host: Option<String>,

  #[clap(long, short)]
  pub port: Option<u16>,

  /// JSON file with dev server options. Flags take precedence over it.
  #[clap(long, short)]
  pub config: Option<PathBuf>,

  #[clap(long)]
  pub debounce_ms: Option<u64>,

  /// Directory outside the root that `/@fs/` urls may read from. Repeatable.
  #[clap(long)]
  pub fs_allow: Vec<PathBuf>,
}
