//! Line-oriented splitting of startup-file bytes around the managed block

use esrever_format::constants::{END_MARKER, START_MARKER};
use esrever_format::{EsreverError, Result};
use std::borrow::Cow;

/// Startup-file bytes split around the managed block.
///
/// Only marker lines are interpreted; everything else is opaque bytes and
/// need not be UTF-8. The single blank line directly above a start marker is
/// treated as part of the block, because [`insert_block`] puts it there. For
/// prior content that had no final newline, [`insert_block`] adds only the
/// newline, and a block at end of file takes that newline back out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSplit {
    /// Bytes before the first block
    pub prefix: Vec<u8>,
    /// First block, markers included; `None` when the text has no block
    pub block: Option<Vec<u8>>,
    /// Bytes after the first block, with any further blocks dropped
    pub suffix: Vec<u8>,
}

impl BlockSplit {
    /// Split `text` around its marker spans.
    ///
    /// A start marker without a later end marker is an error rather than a
    /// deletion to end of file.
    pub fn parse(text: &[u8]) -> Result<Self> {
        let lines: Vec<&[u8]> = text.split_inclusive(|&b| b == b'\n').collect();
        let mut split = BlockSplit {
            prefix: Vec::new(),
            block: None,
            suffix: Vec::new(),
        };

        let mut idx = 0;
        while idx < lines.len() {
            if !is_marker(lines[idx], START_MARKER) {
                split.outside_mut().extend_from_slice(lines[idx]);
                idx += 1;
                continue;
            }

            let end = lines[idx + 1..]
                .iter()
                .position(|line| is_marker(line, END_MARKER))
                .map(|offset| idx + 1 + offset)
                .ok_or(EsreverError::UnterminatedBlock { line: idx + 1 })?;

            let at_eof = end + 1 == lines.len();
            let outside = split.outside_mut();
            if !strip_separator(outside) && at_eof && outside.ends_with(b"\n") {
                outside.pop();
            }
            if split.block.is_none() {
                split.block = Some(lines[idx..=end].concat());
            }
            idx = end + 1;
        }

        Ok(split)
    }

    /// True when a block was found.
    pub fn has_block(&self) -> bool {
        self.block.is_some()
    }

    /// The first block as text, with invalid UTF-8 replaced.
    pub fn block_text(&self) -> Option<Cow<'_, str>> {
        self.block.as_deref().map(String::from_utf8_lossy)
    }

    /// Bytes with every block removed.
    pub fn without_block(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.prefix.len() + self.suffix.len());
        out.extend_from_slice(&self.prefix);
        out.extend_from_slice(&self.suffix);
        out
    }

    fn outside_mut(&mut self) -> &mut Vec<u8> {
        if self.block.is_none() {
            &mut self.prefix
        } else {
            &mut self.suffix
        }
    }
}

/// Remove the managed block from `text`.
///
/// Text without a start marker comes back unchanged.
pub fn remove_block(text: &[u8]) -> Result<Vec<u8>> {
    let split = BlockSplit::parse(text)?;
    if split.has_block() {
        Ok(split.without_block())
    } else {
        Ok(text.to_vec())
    }
}

/// Replace any existing block in `text` with `block`, appended at the end.
///
/// Prior content is kept byte for byte. A newline-terminated prefix gets one
/// blank separator line; an unterminated one gets just its newline.
pub fn insert_block(text: &[u8], block: &str) -> Result<Vec<u8>> {
    let mut out = remove_block(text)?;
    if !out.is_empty() {
        out.push(b'\n');
    }
    out.extend_from_slice(block.as_bytes());
    Ok(out)
}

fn is_marker(line: &[u8], marker: &str) -> bool {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    line == marker.as_bytes()
}

/// Drop the blank line `insert_block` writes above a block.
fn strip_separator(text: &mut Vec<u8>) -> bool {
    if text.as_slice() == b"\n" || text.ends_with(b"\n\n") {
        text.pop();
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block() -> String {
        format!("{START_MARKER}\n# Installed: t\nbody\n{END_MARKER}\n")
    }

    fn remove(text: &str) -> String {
        String::from_utf8(remove_block(text.as_bytes()).unwrap()).unwrap()
    }

    fn insert(text: &str, block: &str) -> String {
        String::from_utf8(insert_block(text.as_bytes(), block).unwrap()).unwrap()
    }

    #[test]
    fn no_markers_is_unchanged() {
        let text = "export PATH=$HOME/bin:$PATH\n\nalias ll='ls -l'\n";
        assert_eq!(remove(text), text);
        assert!(!BlockSplit::parse(text.as_bytes()).unwrap().has_block());
    }

    #[test]
    fn no_trailing_newline_without_markers_is_unchanged() {
        assert_eq!(remove("a\n\nb"), "a\n\nb");
        assert_eq!(remove(""), "");
    }

    #[test]
    fn block_at_end_is_removed_with_separator() {
        let text = format!("alias ll='ls -l'\n\n{}", block());
        assert_eq!(remove(&text), "alias ll='ls -l'\n");
    }

    #[test]
    fn file_containing_only_the_block() {
        assert_eq!(remove(&block()), "");
    }

    #[test]
    fn block_in_the_middle_keeps_both_sides() {
        let text = format!("one\n\n{}two\nthree\n", block());
        let split = BlockSplit::parse(text.as_bytes()).unwrap();
        assert_eq!(split.prefix, b"one\n");
        assert_eq!(split.block_text().as_deref(), Some(block().as_str()));
        assert_eq!(split.suffix, b"two\nthree\n");
    }

    #[test]
    fn block_in_the_middle_without_separator_keeps_newline() {
        let text = format!("one\n{}two\n", block());
        assert_eq!(remove(&text), "one\ntwo\n");
    }

    #[test]
    fn manual_edits_inside_block_are_owned() {
        let text = format!("{START_MARKER}\nmy own line\n{END_MARKER}\nafter\n");
        assert_eq!(remove(&text), "after\n");
    }

    #[test]
    fn only_one_blank_line_is_consumed() {
        let text = format!("a\n\n\n{}", block());
        assert_eq!(remove(&text), "a\n\n");
    }

    #[test]
    fn every_block_is_removed() {
        let text = format!("a\n{}b\n{}c\n", block(), block());
        let split = BlockSplit::parse(text.as_bytes()).unwrap();
        assert_eq!(split.without_block(), b"a\nb\nc\n");
    }

    #[test]
    fn end_marker_without_newline_at_eof() {
        let text = format!("a\n\n{START_MARKER}\nx\n{END_MARKER}");
        assert_eq!(remove(&text), "a\n");
    }

    #[test]
    fn crlf_markers_are_recognized() {
        let text = format!("a\r\n\n{START_MARKER}\r\nx\r\n{END_MARKER}\r\nb\r\n");
        assert_eq!(remove(&text), "a\r\nb\r\n");
    }

    #[test]
    fn unterminated_block_is_an_error() {
        let text = format!("a\nb\n{START_MARKER}\nx\n");
        match remove_block(text.as_bytes()) {
            Err(EsreverError::UnterminatedBlock { line }) => assert_eq!(line, 3),
            other => panic!("expected unterminated block, got {other:?}"),
        }
    }

    #[test]
    fn indented_marker_is_not_a_marker() {
        let text = format!("  {START_MARKER}\n");
        assert_eq!(remove(&text), text);
    }

    #[test]
    fn insert_appends_after_blank_line() {
        assert_eq!(insert("a\n", &block()), format!("a\n\n{}", block()));
    }

    #[test]
    fn insert_terminates_last_line_without_blank() {
        assert_eq!(insert("a", &block()), format!("a\n{}", block()));
    }

    #[test]
    fn unterminated_last_line_round_trips() {
        for original in ["a", "a\nb", "\r", "x\n\r", "a\n\nb"] {
            let installed = insert(original, &block());
            assert_eq!(remove(&installed), original, "round trip of {original:?}");
            assert_eq!(insert(&installed, &block()), installed);
        }
    }

    #[test]
    fn insert_into_empty_text() {
        assert_eq!(insert("", &block()), block());
    }

    #[test]
    fn insert_replaces_previous_block() {
        let first = insert("a\n", &block());
        let replacement = format!("{START_MARKER}\nnew\n{END_MARKER}\n");
        let second = insert(&first, &replacement);
        assert_eq!(second, format!("a\n\n{replacement}"));
        assert_eq!(second.matches(START_MARKER).count(), 1);
    }

    #[test]
    fn insert_moves_middle_block_to_end() {
        let text = format!("a\n\n{}b\n", block());
        assert_eq!(insert(&text, &block()), format!("a\nb\n\n{}", block()));
    }

    #[test]
    fn non_utf8_bytes_outside_block_survive() {
        let original: &[u8] = b"# caf\xe9 comment\nexport A=1\n";
        let installed = insert_block(original, &block()).unwrap();
        assert!(installed.starts_with(original));
        assert_eq!(remove_block(&installed).unwrap(), original);
    }
}
