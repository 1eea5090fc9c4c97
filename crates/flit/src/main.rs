use std::collections::BTreeMap;

use anyhow::Result;
use clap::Parser;

mod check;
mod configure;

#[derive(Parser, Debug)]
#[command(name = "flit")]
#[command(about = "Flang test-suite configuration for an external test engine.", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Run the configuration pass and emit the suite config JSON.
    Configure(configure::ConfigureArgs),
    /// Preflight the site config: directory and tool checks, no mutation.
    Check(check::CheckArgs),
}

fn main() -> std::process::ExitCode {
    match try_main() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            std::process::ExitCode::from(2)
        }
    }
}

fn try_main() -> Result<std::process::ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Command::Configure(args) => configure::cmd_configure(args),
        Command::Check(args) => check::cmd_check(args),
    }
}

/// Parse repeated `--param KEY=VALUE` flags. A bare `KEY` means `KEY=1`;
/// a later flag with the same key wins.
pub(crate) fn parse_params(raw: &[String]) -> Result<BTreeMap<String, String>> {
    let mut params = BTreeMap::new();
    for item in raw {
        let (key, value) = match item.split_once('=') {
            Some((key, value)) => (key, value),
            None => (item.as_str(), "1"),
        };
        let key = key.trim();
        if key.is_empty() {
            anyhow::bail!("--param key must be non-empty, got {:?}", item);
        }
        params.insert(key.to_string(), value.to_string());
    }
    Ok(params)
}
