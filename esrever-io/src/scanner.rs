//! Discovery of candidate command names

use esrever_format::constants::SCANNED_BUILTINS;
use esrever_format::Candidate;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Split a colon-separated search path, dropping empty segments.
pub fn split_search_path(raw: &str) -> Vec<PathBuf> {
    raw.split(':')
        .filter(|segment| !segment.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// The process's own `PATH`, or an empty string when unset.
pub fn default_search_path() -> String {
    std::env::var("PATH").unwrap_or_default()
}

/// Whether `path` is a regular file with an execute bit set.
///
/// Symlinks are followed.
pub fn is_executable_file(path: &Path) -> bool {
    match fs::metadata(path) {
        Ok(meta) => meta.is_file() && has_execute_bit(&meta),
        Err(_) => false,
    }
}

#[cfg(unix)]
fn has_execute_bit(meta: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn has_execute_bit(_meta: &fs::Metadata) -> bool {
    true
}

/// Collects unique candidate names across directories.
#[derive(Debug, Default)]
pub struct CandidateScanner {
    seen: HashSet<String>,
    candidates: Vec<Candidate>,
}

impl CandidateScanner {
    /// Create new scanner
    pub fn new() -> Self {
        Self::default()
    }

    /// Record executables directly inside `dir`.
    ///
    /// Names already seen in an earlier directory are dropped. A missing or
    /// unreadable directory contributes nothing.
    pub fn scan_directory(&mut self, dir: &Path) {
        let names = match list_executables(dir) {
            Ok(names) => names,
            Err(err) => {
                debug!(dir = %dir.display(), error = %err, "skipping unreadable directory");
                return;
            }
        };
        for name in names {
            if self.seen.insert(name.clone()) {
                self.candidates.push(Candidate::in_directory(name, dir));
            }
        }
    }

    /// Append the fixed builtin names not already seen.
    pub fn add_builtins(&mut self) {
        for name in SCANNED_BUILTINS {
            if self.seen.insert(name.to_string()) {
                self.candidates.push(Candidate::builtin(name));
            }
        }
    }

    /// Finish and return candidates in discovery order
    pub fn finish(self) -> Vec<Candidate> {
        self.candidates
    }
}

/// Scan `dirs` in order, then optionally append the builtins.
pub fn scan_candidates(dirs: &[PathBuf], include_builtins: bool) -> Vec<Candidate> {
    let mut scanner = CandidateScanner::new();
    for dir in dirs {
        scanner.scan_directory(dir);
    }
    if include_builtins {
        scanner.add_builtins();
    }
    let candidates = scanner.finish();
    debug!(count = candidates.len(), "scan complete");
    candidates
}

/// Sorted base names of the executables directly inside `dir`.
fn list_executables(dir: &Path) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(_) => continue,
        };
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if is_executable_file(&entry.path()) {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use esrever_format::CandidateOrigin;
    use esrever_test_utils::ExecDirBuilder;

    fn names(candidates: &[Candidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn split_drops_empty_segments() {
        let dirs = split_search_path("/usr/bin::/bin:");
        assert_eq!(dirs, vec![PathBuf::from("/usr/bin"), PathBuf::from("/bin")]);
        assert!(split_search_path("").is_empty());
    }

    #[test]
    fn lists_only_executable_regular_files() {
        let dir = ExecDirBuilder::new()
            .unwrap()
            .executables(&["cat", "ls"])
            .unwrap()
            .plain_file("README")
            .unwrap()
            .subdir("nested")
            .unwrap()
            .build();

        let found = scan_candidates(&[dir.path().to_path_buf()], false);
        assert_eq!(names(&found), vec!["cat", "ls"]);
    }

    #[test]
    fn first_directory_wins() {
        let first = ExecDirBuilder::new().unwrap().executable("tool").unwrap().build();
        let second = ExecDirBuilder::new()
            .unwrap()
            .executables(&["tool", "other"])
            .unwrap()
            .build();

        let found = scan_candidates(
            &[first.path().to_path_buf(), second.path().to_path_buf()],
            false,
        );
        assert_eq!(names(&found), vec!["tool", "other"]);
        assert_eq!(
            found[0].origin,
            CandidateOrigin::Directory(first.path().to_path_buf())
        );
    }

    #[test]
    fn builtins_are_appended_once() {
        let dir = ExecDirBuilder::new()
            .unwrap()
            .executables(&["help", "grep"])
            .unwrap()
            .build();

        let found = scan_candidates(&[dir.path().to_path_buf()], true);
        assert_eq!(
            names(&found),
            vec!["grep", "help", "cd", "exit", "pushd", "popd", "dirs"]
        );
        assert!(matches!(found[1].origin, CandidateOrigin::Directory(_)));
        assert_eq!(found[2].origin, CandidateOrigin::Builtin);
    }

    #[test]
    fn missing_directory_is_skipped() {
        let dir = ExecDirBuilder::new().unwrap().executable("cat").unwrap().build();
        let found = scan_candidates(
            &[
                PathBuf::from("/definitely/not/a/dir"),
                dir.path().to_path_buf(),
            ],
            false,
        );
        assert_eq!(names(&found), vec!["cat"]);
    }

    #[test]
    fn nothing_found_is_empty() {
        assert!(scan_candidates(&[], false).is_empty());
        assert_eq!(scan_candidates(&[], true).len(), SCANNED_BUILTINS.len());
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_executables_count() {
        let dir = ExecDirBuilder::new().unwrap().executable("real").unwrap().build();
        std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("alias")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("missing"), dir.path().join("broken"))
            .unwrap();

        let found = scan_candidates(&[dir.path().to_path_buf()], false);
        assert_eq!(names(&found), vec!["alias", "real"]);
    }

    // macOS filesystems refuse names that are not UTF-8.
    #[cfg(target_os = "linux")]
    #[test]
    fn non_utf8_names_are_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;
        use std::os::unix::fs::PermissionsExt;

        let dir = ExecDirBuilder::new().unwrap().executable("good").unwrap().build();
        let bad = dir.path().join(OsStr::from_bytes(b"bad\xff"));
        fs::write(&bad, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&bad, fs::Permissions::from_mode(0o755)).unwrap();
        assert!(is_executable_file(&bad));

        let found = scan_candidates(&[dir.path().to_path_buf()], false);
        assert_eq!(names(&found), vec!["good"]);
    }
}
