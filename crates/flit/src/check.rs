use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use flit_contracts::CHECK_REPORT_SCHEMA_VERSION;
use flit_core::env::Environment;
use flit_core::features::FeatureSet;
use flit_core::layout;
use flit_core::site::load_site_config;
use flit_core::tools::{candidate_dirs, declared_tools, search_tool, Resolution, ToolPolicy};

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Path to the build-system-generated site config JSON.
    #[arg(long)]
    site: PathBuf,

    /// Runtime parameter, KEY=VALUE (bare KEY means KEY=1). Repeatable.
    #[arg(long = "param")]
    params: Vec<String>,
}

#[derive(Debug, Serialize)]
struct CheckReport {
    schema_version: &'static str,
    ok: bool,
    command: &'static str,
    checks: Vec<Check>,
    suggestions: Vec<String>,
}

#[derive(Debug, Serialize)]
struct Check {
    name: String,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

pub fn cmd_check(args: CheckArgs) -> Result<std::process::ExitCode> {
    let site = load_site_config(&args.site)?;
    let params = crate::parse_params(&args.params)?;

    let mut checks: Vec<Check> = Vec::new();
    let mut suggestions: Vec<String> = Vec::new();

    let dir_fields: Vec<(&str, &str)> = vec![
        ("toolchain_tools_dir", site.toolchain_tools_dir.as_str()),
        ("project_tools_dir", site.project_tools_dir.as_str()),
        ("project_toolchain_dir", site.project_toolchain_dir.as_str()),
        ("obj_root", site.obj_root.as_str()),
        ("lib_dir", site.lib_dir.as_str()),
        ("intrinsic_modules_dir", site.intrinsic_modules_dir.as_str()),
    ];
    for (name, raw) in dir_fields {
        if raw.is_empty() {
            continue;
        }
        let exists = Path::new(raw).is_dir();
        checks.push(Check {
            name: format!("dir_{name}"),
            ok: exists,
            detail: Some(raw.to_string()),
        });
        if !exists {
            suggestions.push(format!(
                "Configured {name} {raw:?} is not a directory; check the build tree."
            ));
        }
    }

    let (env, _features, _layout) = layout::inspect(&site, Environment::new(), FeatureSet::new());
    let dirs = candidate_dirs(&site, &env);
    for spec in declared_tools(&site) {
        if spec.policy != ToolPolicy::Fatal {
            continue;
        }
        if let Some(command) = params.get(&spec.name).filter(|v| !v.is_empty()) {
            checks.push(Check {
                name: format!("tool_{}", spec.name),
                ok: true,
                detail: Some(format!("override: {command}")),
            });
            continue;
        }
        match search_tool(&spec.name, &dirs) {
            Resolution::Found(path) => checks.push(Check {
                name: format!("tool_{}", spec.name),
                ok: true,
                detail: Some(format!("found: {}", path.display())),
            }),
            Resolution::NotFound => {
                checks.push(Check {
                    name: format!("tool_{}", spec.name),
                    ok: false,
                    detail: None,
                });
                suggestions.push(format!(
                    "Build the {} driver or pass --param {}=<command>.",
                    spec.name, spec.name
                ));
            }
        }
    }

    let ok = checks.iter().all(|c| c.ok);
    let report = CheckReport {
        schema_version: CHECK_REPORT_SCHEMA_VERSION,
        ok,
        command: "check",
        checks,
        suggestions,
    };

    let mut bytes = serde_json::to_vec(&report)?;
    bytes.push(b'\n');
    std::io::Write::write_all(&mut std::io::stdout(), &bytes).context("write stdout")?;

    Ok(if ok {
        std::process::ExitCode::SUCCESS
    } else {
        std::process::ExitCode::from(1)
    })
}
