use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use flit_contracts::SUITE_CONFIG_SCHEMA_VERSION;
use serde::Serialize;

use crate::env::Environment;
use crate::features::FeatureSet;
use crate::layout::{self, BuildLayout};
use crate::site::SiteConfig;
use crate::subst::{self, Substitution, SubstitutionTable};
use crate::tools;

pub const SUITE_NAME: &str = "flang";

/// Source-file extensions the engine treats as tests.
pub const TEST_SUFFIXES: &[&str] = &[
    ".f", ".F", ".ff", ".FOR", ".for", ".f77", ".f90", ".F90", ".ff90", ".f95", ".F95", ".ff95",
    ".fpp", ".FPP", ".cuf", ".CUF", ".f18", ".F18", ".fir",
];

/// Auxiliary directories/files the engine never scans for tests.
pub const EXCLUDED_NAMES: &[&str] = &["Inputs", "CMakeLists.txt", "README.txt", "LICENSE.txt"];

/// Everything the external test-execution engine consumes. Immutable once
/// constructed; serialized as the `configure` command's output.
#[derive(Debug, Clone, Serialize)]
pub struct SuiteConfig {
    pub schema_version: &'static str,
    pub name: &'static str,
    pub suffixes: Vec<String>,
    pub excludes: Vec<String>,
    pub test_source_root: String,
    pub test_exec_root: String,
    pub use_external_shell: bool,
    pub layout: BuildLayout,
    pub search_path: Vec<String>,
    pub env_vars: BTreeMap<String, String>,
    pub features: Vec<String>,
    pub substitutions: SubstitutionTable,
}

/// Run the whole configuration pass: inspect the build layout, resolve the
/// declared tools against the resulting search path (a fatal miss aborts
/// here), assemble the substitution table, and fold in the parameter-driven
/// environment overrides.
pub fn configure(
    site: &SiteConfig,
    site_dir: &Path,
    params: &BTreeMap<String, String>,
    engine_defaults: &[Substitution],
    use_external_shell: bool,
) -> Result<SuiteConfig> {
    let (mut env, features, layout) =
        layout::inspect(site, Environment::new(), FeatureSet::new());

    let specs = tools::declared_tools(site);
    let resolved = tools::resolve_tools(&specs, site, &env, params)?;

    let table: SubstitutionTable = subst::build_table(site, &env, engine_defaults, &resolved);

    if params.get("LIBPGMATH").is_some_and(|v| !v.is_empty()) {
        env.set_var("LIBPGMATH", "1");
    }

    let test_source_root = if site.test_source_root.is_empty() {
        site_dir.display().to_string()
    } else {
        site.test_source_root.clone()
    };
    let test_exec_root = Path::new(&site.obj_root).join("test").display().to_string();

    Ok(SuiteConfig {
        schema_version: SUITE_CONFIG_SCHEMA_VERSION,
        name: SUITE_NAME,
        suffixes: TEST_SUFFIXES.iter().map(|s| s.to_string()).collect(),
        excludes: EXCLUDED_NAMES.iter().map(|s| s.to_string()).collect(),
        test_source_root,
        test_exec_root,
        use_external_shell,
        layout,
        search_path: env
            .search_path
            .iter()
            .map(|p| p.display().to_string())
            .collect(),
        env_vars: env.vars.clone(),
        features: features.iter().map(str::to_string).collect(),
        substitutions: table,
    })
}
