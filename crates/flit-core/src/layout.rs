use std::path::Path;

use serde::Serialize;

use crate::env::Environment;
use crate::features::FeatureSet;
use crate::site::SiteConfig;

/// Feature enabled when the optional FIR backend was built (the project's
/// toolchain-copy directory is configured).
pub const FEATURE_FIR: &str = "fir";

/// Summary of what the inspection concluded, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BuildLayout {
    /// Backend tools live in a directory distinct from the main toolchain
    /// tools directory (out-of-tree build).
    pub split: bool,
    /// The optional backend was built at all.
    pub backend_built: bool,
}

/// Inspect the configured tool directories and thread the updated
/// environment and feature-set snapshots back to the caller.
///
/// The project tools directory and the general toolchain directory always
/// join the search path, in that order. A configured (non-empty)
/// toolchain-copy directory joins only when it differs from the general
/// one, and independently enables [`FEATURE_FIR`] — even when it is
/// path-identical to the general directory, matching the original system.
/// An empty toolchain-copy directory means no backend: no feature, no
/// extra entry. This step cannot fail.
pub fn inspect(
    site: &SiteConfig,
    mut env: Environment,
    mut features: FeatureSet,
) -> (Environment, FeatureSet, BuildLayout) {
    env.add_search_dir(Path::new(&site.project_tools_dir));
    env.add_search_dir(Path::new(&site.toolchain_tools_dir));

    let backend_built = !site.project_toolchain_dir.is_empty();
    let split = backend_built && site.project_toolchain_dir != site.toolchain_tools_dir;

    if split {
        env.add_search_dir(Path::new(&site.project_toolchain_dir));
    }
    if backend_built {
        features.enable(FEATURE_FIR);
        if site.project_toolchain_dir != site.toolchain_tools_dir {
            env.add_search_dir(Path::new(&site.project_toolchain_dir));
        }
    }

    (env, features, BuildLayout { split, backend_built })
}

#[cfg(test)]
mod tests {
    use super::{inspect, FEATURE_FIR};
    use crate::env::Environment;
    use crate::features::FeatureSet;
    use crate::site::SiteConfig;

    fn site_with(project_toolchain_dir: &str) -> SiteConfig {
        SiteConfig {
            schema_version: flit_contracts::SITE_CONFIG_SCHEMA_VERSION.to_string(),
            toolchain_tools_dir: "/llvm/bin".to_string(),
            project_tools_dir: "/build/flang/bin".to_string(),
            project_toolchain_dir: project_toolchain_dir.to_string(),
            obj_root: "/build/flang".to_string(),
            lib_dir: "/build/flang/lib".to_string(),
            intrinsic_modules_dir: "/build/flang/include/flang".to_string(),
            sysroot: String::new(),
            cc: "/usr/bin/cc".to_string(),
            cxx: "/usr/bin/c++".to_string(),
            test_source_root: String::new(),
        }
    }

    fn search_path(env: &Environment) -> Vec<String> {
        env.search_path
            .iter()
            .map(|p| p.display().to_string())
            .collect()
    }

    #[test]
    fn unset_toolchain_copy_keeps_baseline_path_and_no_feature() {
        let site = site_with("");
        let (env, features, layout) = inspect(&site, Environment::new(), FeatureSet::new());
        assert_eq!(search_path(&env), vec!["/build/flang/bin", "/llvm/bin"]);
        assert!(!features.is_enabled(FEATURE_FIR));
        assert!(!layout.split);
        assert!(!layout.backend_built);
    }

    #[test]
    fn identical_toolchain_copy_enables_feature_without_extra_entry() {
        let site = site_with("/llvm/bin");
        let (env, features, layout) = inspect(&site, Environment::new(), FeatureSet::new());
        assert_eq!(search_path(&env), vec!["/build/flang/bin", "/llvm/bin"]);
        assert!(features.is_enabled(FEATURE_FIR));
        assert!(!layout.split);
        assert!(layout.backend_built);
    }

    #[test]
    fn split_toolchain_copy_joins_path_after_general_dir() {
        let site = site_with("/alt/bin");
        let (env, features, layout) = inspect(&site, Environment::new(), FeatureSet::new());
        assert_eq!(
            search_path(&env),
            vec!["/build/flang/bin", "/llvm/bin", "/alt/bin"]
        );
        assert!(features.is_enabled(FEATURE_FIR));
        assert!(layout.split);
        assert!(layout.backend_built);
    }
}
