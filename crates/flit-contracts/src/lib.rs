//! Shared, version-pinned schema identifiers.
//!
//! These constants are the single source of truth for the schema/version
//! strings that appear in flit's machine-readable I/O: the site config the
//! build system generates, the suite config the test engine consumes, and
//! the preflight report.

pub const SITE_CONFIG_SCHEMA_VERSION: &str = "flit.site@0.1.0";
pub const SUITE_CONFIG_SCHEMA_VERSION: &str = "flit.suite@0.1.0";
pub const ENGINE_DEFAULTS_SCHEMA_VERSION: &str = "flit.defaults@0.1.0";
pub const CHECK_REPORT_SCHEMA_VERSION: &str = "flit.check.report@0.1.0";
