//! Finding presentation: resolve a JSON-pointer-like path to a line/column in
//! the original file text and render either a CI workflow annotation or a
//! plain `file:line:col message` string.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::validate::{Finding, Severity, ValidationOutcome};

/// Strip a leading BOM and normalize CRLF to LF. Registry files have been
/// authored on both conventions; offsets are computed on the normalized text.
pub fn normalize_content(raw: &str) -> String {
    raw.strip_prefix('\u{feff}').unwrap_or(raw).replace("\r\n", "\n")
}

/// 1-based line/column for a byte offset.
pub fn offset_to_line_col(text: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut col = 1;
    for byte in text.as_bytes().iter().take(offset) {
        if *byte == b'\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}

/// Resolve a path like `/vaults/3/protocol` to the byte offset of the value
/// it points at. Numeric segments index arrays, everything else matches
/// object keys. Returns None when the path does not resolve.
pub fn locate_pointer(text: &str, pointer: &str) -> Option<usize> {
    let trimmed = pointer.strip_prefix('/').unwrap_or(pointer);
    if trimmed.is_empty() {
        return None;
    }
    let mut scanner = Scanner::new(text);
    scanner.skip_ws();
    for segment in trimmed.split('/') {
        match segment.parse::<usize>() {
            Ok(index) => scanner.descend_index(index)?,
            Err(_) => scanner.descend_key(segment)?,
        }
    }
    Some(scanner.pos)
}

struct Scanner<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Scanner {
            bytes: text.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.pos += 1;
        }
    }

    /// Position must be at an object `{`; leaves the position at the start of
    /// the matching member's value.
    fn descend_key(&mut self, key: &str) -> Option<()> {
        if self.peek() != Some(b'{') {
            return None;
        }
        self.pos += 1;
        loop {
            self.skip_ws();
            match self.peek()? {
                b'}' => return None,
                b'"' => {}
                b',' => {
                    self.pos += 1;
                    continue;
                }
                _ => return None,
            }
            let member = self.read_string()?;
            self.skip_ws();
            if self.peek() != Some(b':') {
                return None;
            }
            self.pos += 1;
            self.skip_ws();
            if member == key {
                return Some(());
            }
            self.skip_value()?;
        }
    }

    /// Position must be at an array `[`; leaves the position at the start of
    /// the element with the given index.
    fn descend_index(&mut self, index: usize) -> Option<()> {
        if self.peek() != Some(b'[') {
            return None;
        }
        self.pos += 1;
        let mut current = 0;
        loop {
            self.skip_ws();
            match self.peek()? {
                b']' => return None,
                b',' => {
                    self.pos += 1;
                    continue;
                }
                _ => {}
            }
            if current == index {
                return Some(());
            }
            self.skip_value()?;
            current += 1;
        }
    }

    fn skip_value(&mut self) -> Option<()> {
        self.skip_ws();
        match self.peek()? {
            b'"' => {
                self.read_string()?;
                Some(())
            }
            b'{' | b'[' => self.skip_container(),
            _ => {
                // number, true, false, null
                while let Some(byte) = self.peek() {
                    if matches!(byte, b',' | b'}' | b']' | b' ' | b'\t' | b'\n' | b'\r') {
                        break;
                    }
                    self.pos += 1;
                }
                Some(())
            }
        }
    }

    fn skip_container(&mut self) -> Option<()> {
        let mut depth = 0usize;
        loop {
            match self.peek()? {
                b'"' => {
                    self.read_string()?;
                }
                b'{' | b'[' => {
                    depth += 1;
                    self.pos += 1;
                }
                b'}' | b']' => {
                    depth -= 1;
                    self.pos += 1;
                    if depth == 0 {
                        return Some(());
                    }
                }
                _ => self.pos += 1,
            }
        }
    }

    /// Position must be at an opening quote; consumes the string and returns
    /// its unescaped content.
    fn read_string(&mut self) -> Option<String> {
        if self.peek() != Some(b'"') {
            return None;
        }
        self.pos += 1;
        let mut out = Vec::new();
        loop {
            let byte = self.peek()?;
            self.pos += 1;
            match byte {
                b'"' => break,
                b'\\' => {
                    let escaped = self.peek()?;
                    self.pos += 1;
                    match escaped {
                        b'n' => out.push(b'\n'),
                        b't' => out.push(b'\t'),
                        b'r' => out.push(b'\r'),
                        b'b' => out.push(0x08),
                        b'f' => out.push(0x0c),
                        b'u' => {
                            // Key comparison only needs the escape consumed;
                            // non-ASCII escapes never appear in field names.
                            let hex = self.bytes.get(self.pos..self.pos + 4)?;
                            self.pos += 4;
                            if let Ok(code) = u32::from_str_radix(std::str::from_utf8(hex).ok()?, 16)
                            {
                                if let Some(ch) = char::from_u32(code) {
                                    let mut buf = [0u8; 4];
                                    out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
                                }
                            }
                        }
                        other => out.push(other),
                    }
                }
                other => out.push(other),
            }
        }
        String::from_utf8(out).ok()
    }
}

pub fn is_ci_environment() -> bool {
    ci_env(std::env::var("CI").ok()) || ci_env(std::env::var("GITHUB_ACTIONS").ok())
}

fn ci_env(value: Option<String>) -> bool {
    value.is_some_and(|v| !v.is_empty() && v != "false" && v != "0")
}

/// Render one finding. CI output follows the workflow-command annotation
/// convention; console output is `file:line:col message`. A pointer that
/// does not resolve falls back to the bare message.
pub fn render_finding(finding: &Finding, sources: &HashMap<PathBuf, String>, ci: bool) -> String {
    let located = sources.get(&finding.file).and_then(|raw| {
        let normalized = normalize_content(raw);
        let offset = locate_pointer(&normalized, &finding.pointer)?;
        Some(offset_to_line_col(&normalized, offset))
    });

    let file = finding.file.display();
    match located {
        Some((line, col)) if ci => format!(
            "::{} file={file},line={line},col={col}::{}",
            finding.severity, finding.message
        ),
        Some((line, col)) => format!("{file}:{line}:{col} {}", finding.message),
        None => finding.message.clone(),
    }
}

/// Print every finding (warnings first, errors after, grouped by file) and
/// return the process exit code: non-zero iff any error exists.
pub fn print_report(outcome: &ValidationOutcome) -> i32 {
    let ci = is_ci_environment();
    print_findings(outcome, &outcome.report.warnings, Severity::Warning, ci);
    print_findings(outcome, &outcome.report.errors, Severity::Error, ci);

    if outcome.report.has_errors() {
        1
    } else {
        0
    }
}

fn print_findings(outcome: &ValidationOutcome, findings: &[Finding], severity: Severity, ci: bool) {
    if findings.is_empty() {
        return;
    }
    let mut sorted: Vec<&Finding> = findings.iter().collect();
    sorted.sort_by(|a, b| a.file.cmp(&b.file).then_with(|| a.pointer.cmp(&b.pointer)));

    let (heading, prefix) = match severity {
        Severity::Error => ("Errors found:", "\x1b[31mError\x1b[0m"),
        Severity::Warning => ("Warnings found:", "\x1b[33mWarning\x1b[0m"),
    };
    println!("{heading}");
    for finding in sorted {
        let rendered = render_finding(finding, &outcome.sources, ci);
        if ci {
            println!("{rendered}");
        } else {
            eprintln!("{prefix} {rendered}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::Finding;

    const SAMPLE: &str = r#"{
  "protocols": [
    { "name": "Acme", "url": "https://acme.example" }
  ],
  "vaults": [
    { "vaultAddress": "0x01", "name": "A" },
    { "vaultAddress": "0x02", "name": "B", "categories": ["lending/lp"] }
  ]
}"#;

    #[test]
    fn resolves_nested_array_and_object_paths() {
        let offset = locate_pointer(SAMPLE, "/vaults/1/vaultAddress").expect("path should resolve");
        assert_eq!(&SAMPLE[offset..offset + 6], "\"0x02\"");

        let offset = locate_pointer(SAMPLE, "/protocols/0/url").expect("path should resolve");
        assert!(SAMPLE[offset..].starts_with("\"https://acme.example\""));
    }

    #[test]
    fn reports_line_and_column_one_based() {
        let offset = locate_pointer(SAMPLE, "/vaults/0/name").expect("path should resolve");
        let (line, col) = offset_to_line_col(SAMPLE, offset);
        assert_eq!(line, 6);
        assert_eq!(&SAMPLE[offset..offset + 3], "\"A\"");
        assert!(col > 1);
    }

    #[test]
    fn unresolvable_paths_return_none() {
        assert!(locate_pointer(SAMPLE, "/vaults/9/name").is_none());
        assert!(locate_pointer(SAMPLE, "/missing").is_none());
        assert!(locate_pointer(SAMPLE, "/protocols/0/tags").is_none());
        assert!(locate_pointer(SAMPLE, "").is_none());
    }

    #[test]
    fn normalization_strips_bom_and_crlf() {
        let raw = "\u{feff}{\r\n  \"tokens\": []\r\n}";
        let normalized = normalize_content(raw);
        assert_eq!(normalized, "{\n  \"tokens\": []\n}");

        let offset = locate_pointer(&normalized, "/tokens").expect("path should resolve");
        let (line, col) = offset_to_line_col(&normalized, offset);
        assert_eq!((line, col), (2, 13));
    }

    #[test]
    fn skips_strings_containing_braces_and_escapes() {
        let tricky = r#"{ "a": "va{l}ue with \" quote", "b": [1, 2, {"c": "]"}], "d": 7 }"#;
        let offset = locate_pointer(tricky, "/d").expect("path should resolve");
        assert_eq!(&tricky[offset..offset + 1], "7");
    }

    #[test]
    fn render_formats_console_and_ci_shapes() {
        let mut sources = HashMap::new();
        sources.insert(PathBuf::from("src/vaults/mainnet.json"), SAMPLE.to_string());
        let finding = Finding::error(
            "src/vaults/mainnet.json",
            "/vaults/0/name",
            "bad vault name",
        );

        let console = render_finding(&finding, &sources, false);
        assert!(console.starts_with("src/vaults/mainnet.json:6:"));
        assert!(console.ends_with(" bad vault name"));

        let annotation = render_finding(&finding, &sources, true);
        assert!(annotation.starts_with("::error file=src/vaults/mainnet.json,line=6,col="));
        assert!(annotation.ends_with("::bad vault name"));
    }

    #[test]
    fn render_falls_back_to_bare_message() {
        let finding = Finding::warning("src/tokens/mainnet.json", "/tokens/0/symbol", "casing");
        let rendered = render_finding(&finding, &HashMap::new(), false);
        assert_eq!(rendered, "casing");
    }
}
