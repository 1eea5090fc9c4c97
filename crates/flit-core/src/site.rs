use std::path::Path;

use anyhow::{Context, Result};
use flit_contracts::SITE_CONFIG_SCHEMA_VERSION;
use serde::{Deserialize, Serialize};

/// The site config the embedding build system generates for one build tree.
///
/// All fields are plain strings; path fields are not checked for existence
/// here — a misconfigured path surfaces at tool-resolution time or in the
/// engine, never during load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    pub schema_version: String,
    pub toolchain_tools_dir: String,
    pub project_tools_dir: String,
    #[serde(default)]
    pub project_toolchain_dir: String,
    pub obj_root: String,
    pub lib_dir: String,
    pub intrinsic_modules_dir: String,
    #[serde(default)]
    pub sysroot: String,
    pub cc: String,
    pub cxx: String,
    #[serde(default)]
    pub test_source_root: String,
}

fn normalize_string_in_place(s: &mut String) {
    if s.trim() != s {
        *s = s.trim().to_string();
    }
}

fn validate_non_empty(field: &str, raw: &str) -> Result<()> {
    if raw.is_empty() {
        anyhow::bail!("site.{field} must be non-empty");
    }
    Ok(())
}

pub fn load_site_config(path: &Path) -> Result<SiteConfig> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("[FLIT_SITE_READ] read site config: {}", path.display()))?;
    parse_site_config_bytes(&bytes, path)
}

pub fn parse_site_config_bytes(bytes: &[u8], path: &Path) -> Result<SiteConfig> {
    let mut site: SiteConfig = serde_json::from_slice(bytes).with_context(|| {
        format!("[FLIT_SITE_PARSE] parse site config JSON: {}", path.display())
    })?;

    normalize_string_in_place(&mut site.schema_version);
    normalize_string_in_place(&mut site.toolchain_tools_dir);
    normalize_string_in_place(&mut site.project_tools_dir);
    normalize_string_in_place(&mut site.project_toolchain_dir);
    normalize_string_in_place(&mut site.obj_root);
    normalize_string_in_place(&mut site.lib_dir);
    normalize_string_in_place(&mut site.intrinsic_modules_dir);
    normalize_string_in_place(&mut site.sysroot);
    normalize_string_in_place(&mut site.cc);
    normalize_string_in_place(&mut site.cxx);
    normalize_string_in_place(&mut site.test_source_root);

    if site.schema_version != SITE_CONFIG_SCHEMA_VERSION {
        anyhow::bail!(
            "site schema_version mismatch: expected {} got {:?}",
            SITE_CONFIG_SCHEMA_VERSION,
            site.schema_version
        );
    }
    validate_non_empty("toolchain_tools_dir", &site.toolchain_tools_dir)?;
    validate_non_empty("project_tools_dir", &site.project_tools_dir)?;
    validate_non_empty("obj_root", &site.obj_root)?;
    validate_non_empty("lib_dir", &site.lib_dir)?;
    validate_non_empty("intrinsic_modules_dir", &site.intrinsic_modules_dir)?;
    validate_non_empty("cc", &site.cc)?;
    validate_non_empty("cxx", &site.cxx)?;

    Ok(site)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use serde_json::json;

    use super::parse_site_config_bytes;

    fn site_json() -> serde_json::Value {
        json!({
            "schema_version": "flit.site@0.1.0",
            "toolchain_tools_dir": "/llvm/bin",
            "project_tools_dir": "/build/flang/bin",
            "project_toolchain_dir": "",
            "obj_root": "/build/flang",
            "lib_dir": "/build/flang/lib",
            "intrinsic_modules_dir": "/build/flang/include/flang",
            "sysroot": "",
            "cc": "/usr/bin/cc",
            "cxx": "/usr/bin/c++",
            "test_source_root": ""
        })
    }

    fn parse(value: &serde_json::Value) -> anyhow::Result<super::SiteConfig> {
        let bytes = serde_json::to_vec(value).expect("encode site config");
        parse_site_config_bytes(&bytes, Path::new("flit-site.json"))
    }

    #[test]
    fn parses_and_trims_fields() {
        let mut value = site_json();
        value["cc"] = json!("  /usr/bin/cc  ");
        let site = parse(&value).expect("parse site config");
        assert_eq!(site.cc, "/usr/bin/cc");
        assert_eq!(site.project_toolchain_dir, "");
    }

    #[test]
    fn optional_fields_may_be_omitted() {
        let mut value = site_json();
        value.as_object_mut().unwrap().remove("project_toolchain_dir");
        value.as_object_mut().unwrap().remove("sysroot");
        value.as_object_mut().unwrap().remove("test_source_root");
        let site = parse(&value).expect("parse site config");
        assert_eq!(site.sysroot, "");
        assert_eq!(site.test_source_root, "");
    }

    #[test]
    fn rejects_schema_version_mismatch() {
        let mut value = site_json();
        value["schema_version"] = json!("flit.site@9.9.9");
        let err = parse(&value).unwrap_err();
        assert!(format!("{err:#}").contains("site schema_version mismatch"));
    }

    #[test]
    fn rejects_empty_required_field() {
        let mut value = site_json();
        value["lib_dir"] = json!("   ");
        let err = parse(&value).unwrap_err();
        assert!(format!("{err:#}").contains("site.lib_dir must be non-empty"));
    }

    #[test]
    fn parse_error_names_the_file() {
        let err = parse_site_config_bytes(b"not json", Path::new("bad.json")).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("[FLIT_SITE_PARSE]"));
        assert!(msg.contains("bad.json"));
    }
}
