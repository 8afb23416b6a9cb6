//! Line-based rule import
//!
//! One rule per line. Blank lines and lines starting with `#` or `//` are
//! skipped, and a trailing `;` is dropped. Lines that fail are reported and
//! skipped; the rest are added in file order.

use std::fmt;

use tracing::info;

use crate::knowledge::{KnowledgeBase, RuleId};
use crate::observability::Event;

use super::rule::RuleParser;

/// A line that could not be imported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportIssue {
    /// 1-based line number
    pub line: usize,
    pub message: String,
    /// The line as it appeared in the input
    pub content: String,
}

impl fmt::Display for ImportIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {}: {} | Content: {}", self.line, self.message, self.content)
    }
}

/// Outcome of an import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Ids of the added rules, in file order
    pub added: Vec<RuleId>,
    pub issues: Vec<ImportIssue>,
}

impl ImportReport {
    pub fn added_count(&self) -> usize {
        self.added.len()
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Imports every rule in `content` into the store
pub fn import_rules(kb: &mut KnowledgeBase, content: &str) -> ImportReport {
    let mut report = ImportReport::default();

    let parser = match RuleParser::shared() {
        Ok(parser) => parser,
        Err(err) => {
            report.issues.push(ImportIssue {
                line: 0,
                message: err.to_string(),
                content: String::new(),
            });
            return report;
        }
    };

    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
            continue;
        }
        let line = line.strip_suffix(';').map_or(line, str::trim_end);

        let added = parser
            .parse_rule(line)
            .map_err(|e| e.to_string())
            .and_then(|rule| {
                kb.add_rule(rule.conditions, rule.conclusion, line)
                    .map_err(|e| e.to_string())
            });

        match added {
            Ok(id) => report.added.push(id),
            Err(message) => report.issues.push(ImportIssue {
                line: idx + 1,
                message,
                content: raw.trim_end().to_string(),
            }),
        }
    }

    info!(
        event = %Event::RulesImported,
        added = report.added.len(),
        rejected = report.issues.len(),
        "rules imported"
    );
    report
}
