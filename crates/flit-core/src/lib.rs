//! Test-suite configuration for a Fortran compiler tree.
//!
//! flit-core turns a build-system-generated site config into everything an
//! external shell-style test-execution engine needs before it runs a single
//! test: which files count as tests, a deterministic search path for the
//! tools under test across in-tree and out-of-tree build layouts, the
//! feature names gating optional test subsets, and the ordered
//! token-substitution table test commands are rewritten with.
//!
//! The entry point is [`suite::configure`]; the engine-facing result is
//! [`suite::SuiteConfig`].

pub mod env;
pub mod features;
pub mod layout;
pub mod site;
pub mod subst;
pub mod suite;
pub mod tools;
