//! Property-based tests for startup-file install/uninstall on disk

use esrever_format::constants::{END_MARKER, START_MARKER};
use esrever_io::rcfile::{install_block, uninstall_block};
use esrever_io::{render_block, UninstallOutcome, WrapperSpec};
use proptest::prelude::*;
use std::fs;

/// Arbitrary startup-file bytes: any line content (not necessarily UTF-8),
/// with or without a final newline.
fn rc_bytes() -> impl Strategy<Value = Vec<u8>> {
    (
        prop::collection::vec(prop::collection::vec(any::<u8>(), 0..30), 0..12),
        any::<bool>(),
    )
        .prop_map(|(lines, terminated)| {
            let lines: Vec<Vec<u8>> = lines
                .into_iter()
                .map(|line| line.into_iter().filter(|&b| b != b'\n').collect::<Vec<u8>>())
                .filter(|line| {
                    let line = line.strip_suffix(b"\r").unwrap_or(line);
                    line != START_MARKER.as_bytes() && line != END_MARKER.as_bytes()
                })
                .collect();
            let mut text = lines.join(&b'\n');
            if terminated && !text.is_empty() {
                text.push(b'\n');
            }
            text
        })
}

fn wrappers() -> impl Strategy<Value = Vec<WrapperSpec>> {
    prop::collection::vec("[a-z][a-z0-9_]{1,8}", 1..6)
        .prop_map(|names| names.iter().map(|n| WrapperSpec::new(n)).collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn uninstall_after_install_restores_bytes(original in rc_bytes(), specs in wrappers()) {
        let dir = tempfile::tempdir().unwrap();
        let rc = dir.path().join(".bashrc");
        fs::write(&rc, &original).unwrap();

        install_block(&rc, &render_block(&specs, "2026-01-01T00:00:00Z")).unwrap();
        let installed = fs::read(&rc).unwrap();
        prop_assert!(installed.starts_with(&original));

        install_block(&rc, &render_block(&specs, "2026-02-02T00:00:00Z")).unwrap();
        prop_assert_eq!(fs::read(&rc).unwrap().len(), installed.len());

        prop_assert_eq!(uninstall_block(&rc).unwrap(), UninstallOutcome::Removed);
        prop_assert_eq!(fs::read(&rc).unwrap(), original);
    }
}
