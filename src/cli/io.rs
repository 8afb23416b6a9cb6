//! File I/O for the command layer
//!
//! - Knowledge base files are pretty JSON documents, UTF-8 only
//! - A missing knowledge base file means an empty knowledge base
//! - Saves go through a temporary file and a rename so a crash never
//!   leaves a half-written document behind

use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::{debug, info};

use crate::knowledge::{KnowledgeBase, KnowledgeDocument};
use crate::observability::Event;

use super::errors::{CliError, CliResult};

/// Reads and parses a knowledge base document. The file must exist.
pub fn read_document(path: &Path) -> CliResult<KnowledgeDocument> {
    let content = read_text(path)?;
    Ok(KnowledgeDocument::from_json(&content)?)
}

/// Loads the knowledge base at `path`, or an empty one if the file does
/// not exist yet
pub fn load_kb(path: &Path) -> CliResult<KnowledgeBase> {
    if !path.exists() {
        debug!(path = %path.display(), "no knowledge base file, starting empty");
        return Ok(KnowledgeBase::new());
    }

    let kb = KnowledgeBase::from_document(read_document(path)?)?;
    info!(
        event = %Event::KnowledgeLoaded,
        path = %path.display(),
        facts = kb.fact_count(),
        rules = kb.rule_count(),
        "knowledge base loaded"
    );
    Ok(kb)
}

/// Writes the knowledge base to `path`
pub fn save_kb(path: &Path, kb: &KnowledgeBase) -> CliResult<()> {
    let json = kb.to_document().to_json_pretty()?;

    let tmp = path.with_extension("json.tmp");
    {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(json.as_bytes())?;
        file.write_all(b"\n")?;
        file.sync_all()?;
    }
    fs::rename(&tmp, path)?;

    info!(
        event = %Event::KnowledgeSaved,
        path = %path.display(),
        facts = kb.fact_count(),
        rules = kb.rule_count(),
        "knowledge base saved"
    );
    Ok(())
}

/// Reads a UTF-8 text file, reporting a missing file by name
pub fn read_text(path: &Path) -> CliResult<String> {
    if !path.exists() {
        return Err(CliError::io_error(format!(
            "File '{}' does not exist",
            path.display()
        )));
    }
    Ok(fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::{Conclusion, Condition, Operator};
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty_kb() {
        let dir = TempDir::new().unwrap();
        let kb = load_kb(&dir.path().join("kb.json")).unwrap();
        assert_eq!(kb, KnowledgeBase::new());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kb.json");

        let mut kb = KnowledgeBase::new();
        kb.add_rule(
            vec![Condition::new("Temperatura", Operator::Gt, 38.0)],
            Conclusion::new("Febre", "Sim"),
            "SE Temperatura > 38 ENTÃO Febre = Sim",
        )
        .unwrap();
        kb.add_fact("Temperatura", 39.2).unwrap();
        save_kb(&path, &kb).unwrap();

        assert!(!path.with_extension("json.tmp").exists());
        let loaded = load_kb(&path).unwrap();
        assert_eq!(loaded.facts(), kb.facts());
        assert_eq!(loaded.rules(), kb.rules());
        assert_eq!(loaded.next_rule_id(), 2);
    }

    #[test]
    fn test_invalid_document_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kb.json");
        fs::write(&path, r#"{"facts": 3}"#).unwrap();

        let err = load_kb(&path).unwrap_err();
        assert_eq!(err.code_str(), "KB_CLI_INVALID_KB");
    }

    #[test]
    fn test_read_text_missing() {
        let dir = TempDir::new().unwrap();
        let err = read_text(&dir.path().join("rules.txt")).unwrap_err();
        assert_eq!(err.code_str(), "KB_CLI_IO_ERROR");
        assert!(err.message().contains("does not exist"));
    }
}
