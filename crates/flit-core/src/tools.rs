use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;

use crate::env::{normalize_path, Environment};
use crate::site::SiteConfig;

/// What happens when a declared tool cannot be located.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolPolicy {
    /// Abort the whole configuration pass.
    Fatal,
    /// Contribute nothing, silently.
    Optional,
}

/// A declared logical tool, before resolution.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub name: String,
    pub extra_args: Vec<String>,
    pub policy: ToolPolicy,
}

/// Outcome of a directory search. The caller decides whether `NotFound`
/// aborts (fatal policy) or is skipped (optional policy); absence is not an
/// error here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(PathBuf),
    NotFound,
}

/// A resolved tool: concrete command plus its fixed arguments, verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub command: String,
    pub extra_args: Vec<String>,
}

impl ToolDescriptor {
    /// Command and extra args joined by single spaces, order preserved.
    pub fn command_line(&self) -> String {
        let mut out = self.command.clone();
        for arg in &self.extra_args {
            out.push(' ');
            out.push_str(arg);
        }
        out
    }
}

/// The fixed tool declarations for this suite: one fatal entry, the
/// compiler driver under test.
pub fn declared_tools(site: &SiteConfig) -> Vec<ToolSpec> {
    vec![ToolSpec {
        name: "f18".to_string(),
        extra_args: vec![
            "-intrinsic-module-directory".to_string(),
            site.intrinsic_modules_dir.clone(),
        ],
        policy: ToolPolicy::Fatal,
    }]
}

/// Candidate directories for `search_tool`: the project's toolchain-copy
/// directory (when configured) first, then the environment search path,
/// duplicates skipped.
pub fn candidate_dirs(site: &SiteConfig, env: &Environment) -> Vec<PathBuf> {
    let mut seen: Vec<PathBuf> = Vec::new();
    let mut dirs: Vec<PathBuf> = Vec::new();
    let mut add = |dir: &Path| {
        let norm = normalize_path(dir);
        if seen.contains(&norm) {
            return;
        }
        seen.push(norm);
        dirs.push(dir.to_path_buf());
    };
    if !site.project_toolchain_dir.is_empty() {
        add(Path::new(&site.project_toolchain_dir));
    }
    for dir in &env.search_path {
        add(dir);
    }
    dirs
}

/// Search the candidate directories in order for an executable named
/// exactly `name`. First hit wins; no PATH fallback, by design.
pub fn search_tool(name: &str, dirs: &[PathBuf]) -> Resolution {
    for dir in dirs {
        let cand = dir.join(name);
        if cand.is_file() && is_executable(&cand) {
            return Resolution::Found(cand);
        }
    }
    Resolution::NotFound
}

fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt as _;
        if let Ok(meta) = std::fs::metadata(path) {
            return meta.permissions().mode() & 0o111 != 0;
        }
        false
    }
    #[cfg(not(unix))]
    {
        path.is_file()
    }
}

/// Resolve every declared tool. A runtime parameter named like a tool
/// overrides directory search entirely; its value is the command verbatim.
/// A fatal-policy miss aborts; an optional miss drops the tool.
pub fn resolve_tools(
    specs: &[ToolSpec],
    site: &SiteConfig,
    env: &Environment,
    params: &BTreeMap<String, String>,
) -> Result<Vec<ToolDescriptor>> {
    let dirs = candidate_dirs(site, env);
    let mut out = Vec::with_capacity(specs.len());
    for spec in specs {
        if let Some(command) = params.get(&spec.name).filter(|v| !v.is_empty()) {
            out.push(ToolDescriptor {
                name: spec.name.clone(),
                command: command.clone(),
                extra_args: spec.extra_args.clone(),
            });
            continue;
        }
        match search_tool(&spec.name, &dirs) {
            Resolution::Found(path) => out.push(ToolDescriptor {
                name: spec.name.clone(),
                command: path.display().to_string(),
                extra_args: spec.extra_args.clone(),
            }),
            Resolution::NotFound => match spec.policy {
                ToolPolicy::Fatal => {
                    let searched: Vec<String> =
                        dirs.iter().map(|d| d.display().to_string()).collect();
                    anyhow::bail!(
                        "[FLIT_TOOL_UNRESOLVED] required tool {:?} not found in any candidate directory: [{}]",
                        spec.name,
                        searched.join(", ")
                    );
                }
                ToolPolicy::Optional => {}
            },
        }
    }
    Ok(out)
}
