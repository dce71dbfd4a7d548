// ============================================================
// Layer 4 — Conversation Loader
// ============================================================
// Reads a conversation transcript from disk. The file format is
// one conversation turn per line:
//
//   hello how are you
//   fine thanks, and you?
//   ...
//
// Line endings are stripped. Blank lines are kept: they are
// real (empty) turns and encode to an all-EOL matrix.

use std::{fs, path::Path};

use crate::domain::error::CodecError;

/// Loads the turns of a conversation file.
pub struct ConversationLoader;

impl ConversationLoader {
    pub fn new() -> Self {
        Self
    }

    /// Read every line of `path`.
    /// Fails with CodecError::Io if the file is missing or unreadable.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Vec<String>, CodecError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| CodecError::io(path, e))?;
        let lines: Vec<String> = text.lines().map(str::to_string).collect();

        tracing::debug!("Read {} lines from '{}'", lines.len(), path.display());
        Ok(lines)
    }
}

impl Default for ConversationLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_lines_in_order() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.txt");
        fs::write(&path, "hello\r\nhow are you\n\nbye\n").unwrap();

        let lines = ConversationLoader::new().load(&path).unwrap();
        assert_eq!(lines, vec!["hello", "how are you", "", "bye"]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir    = tempfile::tempdir().unwrap();
        let result = ConversationLoader::new().load(dir.path().join("missing.txt"));
        assert!(matches!(result, Err(CodecError::Io { .. })));
    }
}
