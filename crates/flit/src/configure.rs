use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use flit_core::site::load_site_config;
use flit_core::subst::load_engine_defaults;
use flit_core::suite::configure;

#[derive(Debug, Args)]
pub struct ConfigureArgs {
    /// Path to the build-system-generated site config JSON.
    #[arg(long)]
    site: PathBuf,

    /// Engine-owned default substitutions to splice into the table.
    #[arg(long)]
    defaults: Option<PathBuf>,

    /// Runtime parameter, KEY=VALUE (bare KEY means KEY=1). Repeatable.
    #[arg(long = "param")]
    params: Vec<String>,

    /// Declare the suite as requiring the engine's external shell mode.
    #[arg(long)]
    external_shell: bool,

    /// Write the suite config here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Pretty-print the output JSON.
    #[arg(long)]
    pretty: bool,
}

pub fn cmd_configure(args: ConfigureArgs) -> Result<std::process::ExitCode> {
    let site = load_site_config(&args.site)?;
    let site_dir = args.site.parent().unwrap_or_else(|| Path::new("."));
    let params = crate::parse_params(&args.params)?;
    let engine_defaults = match &args.defaults {
        Some(path) => load_engine_defaults(path)?,
        None => Vec::new(),
    };

    let suite = configure(
        &site,
        site_dir,
        &params,
        &engine_defaults,
        args.external_shell,
    )?;

    let mut bytes = if args.pretty {
        serde_json::to_vec_pretty(&suite)?
    } else {
        serde_json::to_vec(&suite)?
    };
    bytes.push(b'\n');

    match &args.out {
        Some(path) => write_bytes(path, &bytes)?,
        None => {
            std::io::Write::write_all(&mut std::io::stdout(), &bytes).context("write stdout")?;
        }
    }

    Ok(std::process::ExitCode::SUCCESS)
}

fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create dir: {}", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write: {}", path.display()))
}
