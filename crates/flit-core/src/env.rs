use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

/// Search path and variable overrides handed to the test-execution engine.
///
/// The search path starts empty and never inherits the invoking process's
/// PATH: tool resolution must behave the same on every machine, regardless
/// of what else is installed. Entries are append-only; a directory already
/// present (after `.`-component normalization) is not added twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    pub search_path: Vec<PathBuf>,
    pub vars: BTreeMap<String, String>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `dir` to the search path unless an equal entry already exists.
    pub fn add_search_dir(&mut self, dir: &Path) {
        let norm = normalize_path(dir);
        if self.search_path.iter().any(|p| normalize_path(p) == norm) {
            return;
        }
        self.search_path.push(dir.to_path_buf());
    }

    /// Set a variable override. Later writes win; there is no unset.
    pub fn set_var(&mut self, key: &str, value: &str) {
        self.vars.insert(key.to_string(), value.to_string());
    }

    /// The search path as one PATH-style string.
    pub fn search_path_string(&self) -> String {
        let sep = if cfg!(windows) { ";" } else { ":" };
        self.search_path
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(sep)
    }
}

/// Drop `.` components so `/x/bin` and `/x/./bin` compare equal.
pub(crate) fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        if component == Component::CurDir {
            continue;
        }
        out.push(Path::new(component.as_os_str()));
    }
    out
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::Environment;

    #[test]
    fn search_dirs_keep_insertion_order() {
        let mut env = Environment::new();
        env.add_search_dir(Path::new("/build/flang/bin"));
        env.add_search_dir(Path::new("/llvm/bin"));
        env.add_search_dir(Path::new("/alt/bin"));

        let got: Vec<String> = env
            .search_path
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        assert_eq!(got, vec!["/build/flang/bin", "/llvm/bin", "/alt/bin"]);
    }

    #[test]
    fn duplicate_search_dirs_are_skipped() {
        let mut env = Environment::new();
        env.add_search_dir(Path::new("/llvm/bin"));
        env.add_search_dir(Path::new("/llvm/bin"));
        env.add_search_dir(Path::new("/llvm/./bin"));
        assert_eq!(env.search_path.len(), 1);
    }

    #[test]
    fn vars_last_write_wins() {
        let mut env = Environment::new();
        env.set_var("LIBPGMATH", "0");
        env.set_var("LIBPGMATH", "1");
        assert_eq!(env.vars.get("LIBPGMATH").map(String::as_str), Some("1"));
    }

    #[cfg(unix)]
    #[test]
    fn search_path_string_joins_with_colon() {
        let mut env = Environment::new();
        env.add_search_dir(Path::new("/a"));
        env.add_search_dir(Path::new("/b"));
        assert_eq!(env.search_path_string(), "/a:/b");
    }
}
