#![warn(missing_docs)]
//! `editor-lint-simple` - Simple (regex-based) diagnostic sources for `editor-lint`.
//!
//! This crate is intended for lightweight formats and quick checks (trailing whitespace,
//! TODO markers, INI syntax) where a real compiler or language server is unnecessary.

use editor_lint::{Diagnostic, DiagnosticRange, DiagnosticSource, Document, Severity};
use regex::Regex;
use std::collections::HashSet;
use std::convert::Infallible;

/// A single regex lint rule, matched line by line.
#[derive(Debug, Clone)]
pub struct RegexLintRule {
    regex: Regex,
    severity: Severity,
    message: String,
    capture_group: Option<usize>,
}

impl RegexLintRule {
    /// Compile `pattern` into a rule reporting `message` at `severity`.
    pub fn new(
        pattern: &str,
        severity: Severity,
        message: impl Into<String>,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
            severity,
            message: message.into(),
            capture_group: None,
        })
    }

    /// Report only a capture group of each match.
    ///
    /// Example (INI line without `=`):
    /// - pattern: `^\\s*([^\\[;#=\\s][^=]*?)\\s*$`
    /// - capture_group: `1` (the stray text)
    pub fn with_capture_group(mut self, group: usize) -> Self {
        self.capture_group = Some(group);
        self
    }

    /// Severity of diagnostics produced by this rule.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Message attached to each diagnostic.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A simple regex-based linter.
///
/// Designed for simple formats and style checks. It is *not* intended to be a full parser.
#[derive(Debug, Clone)]
pub struct RegexLinter {
    label: String,
    rules: Vec<RegexLintRule>,
}

impl RegexLinter {
    /// Create a linter; `label` becomes the diagnostic source.
    pub fn new(label: impl Into<String>, rules: Vec<RegexLintRule>) -> Self {
        Self {
            label: label.into(),
            rules,
        }
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> &[RegexLintRule] {
        &self.rules
    }

    /// Run all rules over the whole document and return diagnostics (char offsets).
    pub fn check(&self, document: &Document) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for line in 0..document.line_count() {
            let Some(line_text) = document.line_text(line) else {
                continue;
            };
            let line_start = document.line_start(line);

            for rule in &self.rules {
                if let Some(group) = rule.capture_group {
                    for caps in rule.regex.captures_iter(&line_text) {
                        let Some(m) = caps.get(group) else {
                            continue;
                        };
                        if let Some(range) =
                            range_from_match(line_start, &line_text, m.start(), m.end())
                        {
                            diagnostics.push(self.diagnostic(rule, range));
                        }
                    }
                } else {
                    for m in rule.regex.find_iter(&line_text) {
                        if let Some(range) =
                            range_from_match(line_start, &line_text, m.start(), m.end())
                        {
                            diagnostics.push(self.diagnostic(rule, range));
                        }
                    }
                }
            }
        }

        tracing::trace!(linter = %self.label, count = diagnostics.len(), "regex lint finished");
        diagnostics
    }

    fn diagnostic(&self, rule: &RegexLintRule, range: DiagnosticRange) -> Diagnostic {
        Diagnostic::new(range, rule.severity, rule.message.clone()).with_source(self.label.clone())
    }

    /// Plain-text checks: trailing whitespace and `TODO`/`FIXME` markers.
    pub fn text_default() -> Result<Self, regex::Error> {
        Ok(Self::new(
            "text",
            vec![
                RegexLintRule::new(r"[ \t]+$", Severity::Warning, "trailing whitespace")?,
                RegexLintRule::new(r"\b(?:TODO|FIXME)\b", Severity::Info, "unresolved marker")?,
            ],
        ))
    }

    /// A small INI checker (lines that are neither sections, comments nor `key = value`).
    pub fn ini_default() -> Result<Self, regex::Error> {
        Ok(Self::new(
            "ini",
            vec![
                // Anything that is not a section, comment, or assignment.
                RegexLintRule::new(
                    r"^\s*([^\[;#=\s][^=]*?)\s*$",
                    Severity::Error,
                    "expected `key = value`",
                )?
                .with_capture_group(1),
                // Unterminated section header: [section
                RegexLintRule::new(r"^\s*\[[^\]]*$", Severity::Error, "unterminated section")?,
                // Empty key: = value
                RegexLintRule::new(r"^\s*=", Severity::Warning, "missing key")?,
            ],
        ))
    }
}

impl DiagnosticSource for RegexLinter {
    type Error = Infallible;

    fn lint(&mut self, document: &Document) -> Result<Vec<Diagnostic>, Self::Error> {
        Ok(self.check(document))
    }
}

/// Flags `let` bindings that shadow an earlier binding of the same name.
#[derive(Debug, Clone)]
pub struct RedeclarationLinter {
    binding: Regex,
    severity: Severity,
}

impl RedeclarationLinter {
    /// Create a linter reporting redeclarations at `severity`.
    pub fn new(severity: Severity) -> Result<Self, regex::Error> {
        Ok(Self {
            binding: Regex::new(r"\blet\s+(?:mut\s+)?([A-Za-z_][A-Za-z0-9_]*)")?,
            severity,
        })
    }

    /// Scan the document and report every binding after the first for each name.
    pub fn check(&self, document: &Document) -> Vec<Diagnostic> {
        let text = document.text();
        let mut seen = HashSet::new();
        let mut diagnostics = Vec::new();
        let mut offsets = CharOffsets::new(&text);

        for caps in self.binding.captures_iter(&text) {
            let Some(name) = caps.get(1) else {
                continue;
            };
            if seen.insert(name.as_str()) {
                continue;
            }
            let start = offsets.char_at(name.start());
            let end = offsets.char_at(name.end());
            diagnostics.push(
                Diagnostic::new(
                    DiagnosticRange::new(start, end),
                    self.severity,
                    format!("redeclared {}", name.as_str()),
                )
                .with_source("redeclaration"),
            );
        }
        diagnostics
    }
}

impl DiagnosticSource for RedeclarationLinter {
    type Error = Infallible;

    fn lint(&mut self, document: &Document) -> Result<Vec<Diagnostic>, Self::Error> {
        Ok(self.check(document))
    }
}

/// Byte to char offset conversion for monotonically increasing byte offsets.
struct CharOffsets<'a> {
    text: &'a str,
    byte: usize,
    chars: usize,
}

impl<'a> CharOffsets<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            byte: 0,
            chars: 0,
        }
    }

    fn char_at(&mut self, byte: usize) -> usize {
        if byte < self.byte {
            self.byte = 0;
            self.chars = 0;
        }
        self.chars += self.text[self.byte..byte].chars().count();
        self.byte = byte;
        self.chars
    }
}

fn range_from_match(
    line_start_offset: usize,
    line_text: &str,
    match_start_byte: usize,
    match_end_byte: usize,
) -> Option<DiagnosticRange> {
    if match_start_byte >= match_end_byte || match_end_byte > line_text.len() {
        return None;
    }

    let start_col = line_text[..match_start_byte].chars().count();
    let end_col = line_text[..match_end_byte].chars().count();
    if start_col >= end_col {
        return None;
    }

    Some(DiagnosticRange::new(
        line_start_offset + start_col,
        line_start_offset + end_col,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ranges(diagnostics: &[Diagnostic]) -> Vec<(usize, usize)> {
        diagnostics
            .iter()
            .map(|d| (d.range.start, d.range.end))
            .collect()
    }

    #[test]
    fn test_text_default_trailing_whitespace_and_markers() {
        let doc = Document::new("值 = 1  \n// TODO: fix\nok");
        let linter = RegexLinter::text_default().unwrap();
        let diagnostics = linter.check(&doc);

        assert_eq!(ranges(&diagnostics), vec![(5, 7), (11, 15)]);
        assert_eq!(diagnostics[0].severity, Severity::Warning);
        assert_eq!(diagnostics[1].severity, Severity::Info);
        assert_eq!(diagnostics[1].source.as_deref(), Some("text"));
    }

    #[test]
    fn test_ini_default_capture_groups() {
        let doc = Document::new("[core]\nname = editor\nstray\n;comment\n[broken");
        let linter = RegexLinter::ini_default().unwrap();
        let diagnostics = linter.check(&doc);

        let messages: Vec<&str> = diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["expected `key = value`", "unterminated section"]);
        assert_eq!(ranges(&diagnostics)[0], (21, 26));
    }

    #[test]
    fn test_redeclaration_reports_second_binding() {
        let doc = Document::new("let x = 1\nlet x = 2");
        let linter = RedeclarationLinter::new(Severity::Warning).unwrap();
        let diagnostics = linter.check(&doc);

        assert_eq!(ranges(&diagnostics), vec![(14, 15)]);
        assert_eq!(diagnostics[0].message, "redeclared x");
    }

    #[test]
    fn test_redeclaration_counts_chars_not_bytes() {
        let doc = Document::new("let é = '日本';\nlet mut é = 2;");
        let linter = RedeclarationLinter::new(Severity::Error).unwrap();
        // `é` is not an ASCII identifier, so nothing matches.
        assert!(linter.check(&doc).is_empty());

        let doc = Document::new("// 日本\nlet a = 1;\nlet mut a = 2;");
        let diagnostics = linter.check(&doc);
        assert_eq!(ranges(&diagnostics), vec![(25, 26)]);
    }
}
