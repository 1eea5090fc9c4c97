use std::path::Path;

use anyhow::{Context, Result};
use flit_contracts::ENGINE_DEFAULTS_SCHEMA_VERSION;
use serde::{Deserialize, Serialize};

use crate::env::Environment;
use crate::site::SiteConfig;
use crate::tools::ToolDescriptor;

/// One literal token → replacement pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substitution {
    pub token: String,
    pub replacement: String,
}

impl Substitution {
    pub fn new(token: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            replacement: replacement.into(),
        }
    }
}

/// Ordered substitution list consumed by the test-execution engine.
///
/// This is a sequence, not a map: the engine resolves a token with the
/// **last** matching entry, so a more specific entry appended later shadows
/// an earlier generic one. Callers must append overrides after defaults,
/// never before.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubstitutionTable {
    entries: Vec<Substitution>,
}

impl SubstitutionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, token: impl Into<String>, replacement: impl Into<String>) {
        self.entries.push(Substitution::new(token, replacement));
    }

    pub fn extend(&mut self, entries: impl IntoIterator<Item = Substitution>) {
        self.entries.extend(entries);
    }

    /// The replacement the engine would observe for `token`: last match wins.
    pub fn resolve(&self, token: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.token == token)
            .map(|e| e.replacement.as_str())
    }

    pub fn entries(&self) -> &[Substitution] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// The default substitutions the engine owns; flit splices them into the
/// table verbatim, between the search-path entry and its own entries.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineDefaults {
    pub schema_version: String,
    pub substitutions: Vec<Substitution>,
}

pub fn load_engine_defaults(path: &Path) -> Result<Vec<Substitution>> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("[FLIT_DEFAULTS_READ] read engine defaults: {}", path.display()))?;
    let defaults: EngineDefaults = serde_json::from_slice(&bytes).with_context(|| {
        format!(
            "[FLIT_DEFAULTS_PARSE] parse engine defaults JSON: {}",
            path.display()
        )
    })?;
    if defaults.schema_version.trim() != ENGINE_DEFAULTS_SCHEMA_VERSION {
        anyhow::bail!(
            "engine defaults schema_version mismatch: expected {} got {:?}",
            ENGINE_DEFAULTS_SCHEMA_VERSION,
            defaults.schema_version
        );
    }
    Ok(defaults.substitutions)
}

fn compiler_invocation(compiler: &str, sysroot: &str) -> String {
    if sysroot.is_empty() {
        compiler.to_string()
    } else {
        format!("{compiler} -isysroot {sysroot}")
    }
}

/// Assemble the full table in the fixed append order: search path, engine
/// defaults, directory tokens, C/C++ compiler invocations, resolved tools.
pub fn build_table(
    site: &SiteConfig,
    env: &Environment,
    engine_defaults: &[Substitution],
    tools: &[ToolDescriptor],
) -> SubstitutionTable {
    let mut table = SubstitutionTable::new();

    table.push("%PATH%", env.search_path_string());
    table.extend(engine_defaults.iter().cloned());

    table.push("%B", site.obj_root.clone());
    table.push("%L", site.lib_dir.clone());
    table.push("%moddir", site.intrinsic_modules_dir.clone());

    table.push("%CXX", compiler_invocation(&site.cxx, &site.sysroot));
    table.push("%CC", compiler_invocation(&site.cc, &site.sysroot));

    for tool in tools {
        table.push(format!("%{}", tool.name), tool.command_line());
    }

    table
}
