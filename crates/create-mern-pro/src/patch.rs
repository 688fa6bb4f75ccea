//! Text patching for generated source files
//!
//! Conditional features are applied by editing known boilerplate as plain
//! text. Every edit is a no-op when its marker is absent, so rules can run
//! against any template revision and the caller only sees what changed.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

const DIV_OPEN: &str = "<div";
const DIV_CLOSE: &str = "</div>";

/// A generated file loaded for editing
#[derive(Debug)]
pub struct SourceFile {
    path: PathBuf,
    content: String,
    dirty: bool,
}

impl SourceFile {
    /// Load `path`, or `None` when the file does not exist
    pub fn open(path: &Path) -> Result<Option<Self>> {
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "patch target missing, skipping");
            return Ok(None);
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read: {}", path.display()))?;
        Ok(Some(Self::from_string(path, content)))
    }

    pub fn from_string(path: &Path, content: impl Into<String>) -> Self {
        Self {
            path: path.to_path_buf(),
            content: content.into(),
            dirty: false,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    fn miss(&self, edit: &str, marker: &str) -> bool {
        tracing::debug!(file = %self.file_name(), edit, marker, "marker not found");
        false
    }

    fn commit(&mut self, edit: &str, content: String) -> bool {
        tracing::debug!(file = %self.file_name(), edit, "patched");
        self.content = content;
        self.dirty = true;
        true
    }

    /// Remove the first occurrence of `needle`
    pub fn remove_first(&mut self, needle: &str) -> bool {
        self.replace_first(needle, "")
    }

    /// Replace the first occurrence of `needle`
    pub fn replace_first(&mut self, needle: &str, with: &str) -> bool {
        if needle.is_empty() || !self.content.contains(needle) {
            return self.miss("replace", needle);
        }
        let updated = self.content.replacen(needle, with, 1);
        self.commit("replace", updated)
    }

    /// Drop everything from the first occurrence of `marker` to the end
    pub fn truncate_from(&mut self, marker: &str) -> bool {
        match self.content.find(marker) {
            Some(idx) => {
                let updated = self.content[..idx].to_string();
                self.commit("truncate", updated)
            }
            None => self.miss("truncate", marker),
        }
    }

    /// Remove a JSX section.
    ///
    /// The section starts on the line holding `start_marker` and ends with the
    /// `<div>` element that follows `anchor_marker`. The element's end is found
    /// by balancing nested `<div` / `</div>` tags. The whole lines are removed,
    /// together with one blank line after the section.
    pub fn remove_block(&mut self, start_marker: &str, anchor_marker: &str) -> bool {
        let Some(start) = self.content.find(start_marker) else {
            return self.miss("remove_block", start_marker);
        };
        let Some(anchor) = self.content[start..].find(anchor_marker).map(|i| i + start) else {
            return self.miss("remove_block", anchor_marker);
        };
        let Some(end) = element_end(&self.content, anchor + anchor_marker.len()) else {
            return self.miss("remove_block", DIV_CLOSE);
        };

        let line_start = self.content[..start].rfind('\n').map(|i| i + 1).unwrap_or(0);
        let mut cut_end = end;

        // Take the rest of the closing line, then one blank line
        let rest = &self.content[cut_end..];
        if let Some(nl) = rest.find('\n') {
            if rest[..nl].trim().is_empty() {
                cut_end += nl + 1;
                let after = &self.content[cut_end..];
                if let Some(nl) = after.find('\n') {
                    if after[..nl].trim().is_empty() {
                        cut_end += nl + 1;
                    }
                }
            }
        }

        let mut updated = String::with_capacity(self.content.len());
        updated.push_str(&self.content[..line_start]);
        updated.push_str(&self.content[cut_end..]);
        self.commit("remove_block", updated)
    }

    /// Keep only the lines for which `keep` returns true.
    ///
    /// `keep` sees each line without its terminator; kept lines retain
    /// theirs, so CRLF files stay CRLF.
    pub fn retain_lines<F>(&mut self, keep: F) -> bool
    where
        F: Fn(&str) -> bool,
    {
        let mut removed = 0;
        let mut updated = String::with_capacity(self.content.len());
        for line in self.content.split_inclusive('\n') {
            if keep(line.trim_end_matches(['\r', '\n'])) {
                updated.push_str(line);
            } else {
                removed += 1;
            }
        }

        if removed == 0 {
            return self.miss("retain_lines", "<predicate>");
        }
        self.commit("retain_lines", updated)
    }

    /// Write back to disk if anything changed
    pub fn save(&self) -> Result<bool> {
        if !self.dirty {
            return Ok(false);
        }
        fs::write(&self.path, &self.content)
            .with_context(|| format!("Failed to write: {}", self.path.display()))?;
        Ok(true)
    }
}

/// Byte offset just past the `</div>` closing the first `<div` at or after `from`
fn element_end(content: &str, from: usize) -> Option<usize> {
    let open = find_div_open(content, from)?;
    let mut depth = 0usize;
    let mut pos = open;

    loop {
        let next_open = find_div_open(content, pos);
        let next_close = content[pos..].find(DIV_CLOSE).map(|i| i + pos);

        match (next_open, next_close) {
            (Some(o), Some(c)) if o < c => {
                let end = tag_end(content, o)?;
                if !content[..end].trim_end().ends_with('/') {
                    depth += 1;
                }
                pos = end + 1;
            }
            (_, Some(c)) => {
                depth = depth.checked_sub(1)?;
                pos = c + DIV_CLOSE.len();
                if depth == 0 {
                    return Some(pos);
                }
            }
            _ => return None,
        }
    }
}

/// Offset of the `>` ending the tag opened at `start`.
///
/// Quoted attribute values and `{...}` expressions are skipped, so the `>`
/// of an arrow function inside `onClick={() => ...}` does not end the tag.
fn tag_end(content: &str, start: usize) -> Option<usize> {
    let mut braces = 0usize;
    let mut quote: Option<char> = None;

    for (i, c) in content[start..].char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'' | '`') => quote = Some(c),
            (None, '{') => braces += 1,
            (None, '}') => braces = braces.saturating_sub(1),
            (None, '>') if braces == 0 => return Some(start + i),
            _ => {}
        }
    }
    None
}

/// Next `<div` that is a tag name on its own (not `<divider`)
fn find_div_open(content: &str, from: usize) -> Option<usize> {
    let mut pos = from;
    while let Some(i) = content[pos..].find(DIV_OPEN) {
        let at = pos + i;
        let next = content[at + DIV_OPEN.len()..].chars().next();
        if matches!(next, Some(c) if c.is_whitespace() || c == '>' || c == '/') {
            return Some(at);
        }
        pos = at + DIV_OPEN.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn file(content: &str) -> SourceFile {
        SourceFile::from_string(Path::new("Login.tsx"), content)
    }

    #[test]
    fn test_remove_first_only_once() {
        let mut f = file("a, b, a, b");
        assert!(f.remove_first("a, "));
        assert_eq!(f.content(), "b, a, b");
        assert!(f.is_dirty());
    }

    #[test]
    fn test_missing_marker_is_noop() {
        let mut f = file("unchanged");
        assert!(!f.remove_first("nope"));
        assert!(!f.truncate_from("nope"));
        assert!(!f.remove_block("{/* A */}", "{/* B */}"));
        assert!(!f.retain_lines(|_| true));
        assert_eq!(f.content(), "unchanged");
        assert!(!f.is_dirty());
    }

    #[test]
    fn test_truncate_from() {
        let mut f = file("keep\n// Handlers\nexport const x = 1;\n");
        assert!(f.truncate_from("// Handlers"));
        assert_eq!(f.content(), "keep\n");
    }

    #[test]
    fn test_remove_block_balances_nested_divs() {
        let src = "\
            </FormProvider>

            {/* Divider */}
            <div className=\"relative\">
                <div className=\"line\" />
                <span>Or</span>
            </div>

            {/* OAuth Buttons */}
            <div className=\"grid\">
                <a href=\"g\">
                    <div className=\"icon\"><svg /></div>
                </a>
                <a href=\"h\">GitHub</a>
            </div>

            {/* Sign up link */}
            <p>Sign up</p>
";
        let mut f = file(src);
        assert!(f.remove_block("{/* Divider */}", "{/* OAuth Buttons */}"));
        assert_eq!(
            f.content(),
            "</FormProvider>\n\n            {/* Sign up link */}\n            <p>Sign up</p>\n"
        );
    }

    #[test]
    fn test_remove_block_requires_anchor_after_start() {
        let mut f = file("{/* OAuth Buttons */}<div></div>\n{/* Divider */}\n");
        assert!(!f.remove_block("{/* Divider */}", "{/* OAuth Buttons */}"));
    }

    #[test]
    fn test_element_end_ignores_divider_tags() {
        let src = "<div><divider></divider></div>tail";
        assert_eq!(element_end(src, 0), Some(src.len() - "tail".len()));
    }

    #[test]
    fn test_retain_lines_keeps_trailing_newline() {
        let mut f = file("fastapi==0.1\nauthlib==1.2\nuvicorn\n");
        assert!(f.retain_lines(|l| !l.contains("authlib")));
        assert_eq!(f.content(), "fastapi==0.1\nuvicorn\n");
    }

    #[test]
    fn test_retain_lines_preserves_crlf() {
        let mut f = file("fastapi==0.1\r\nauthlib==1.2\r\nuvicorn\r\n");
        assert!(f.retain_lines(|l| l != "authlib==1.2"));
        assert_eq!(f.content(), "fastapi==0.1\r\nuvicorn\r\n");
    }

    #[test]
    fn test_remove_block_skips_arrow_in_self_closing_div() {
        let src = "\
<div className=\"card\">
    {/* Divider */}
    <div className=\"relative\" />

    {/* OAuth Buttons */}
    <div className=\"grid\">
        <div onClick={() => go('google')} />
        <a href={authService.getGitHubAuthUrl()}>GitHub</a>
    </div>

    {/* Footer */}
    <p>keep</p>
</div>
";
        let mut f = file(src);
        assert!(f.remove_block("{/* Divider */}", "{/* OAuth Buttons */}"));
        assert_eq!(
            f.content(),
            "<div className=\"card\">\n    {/* Footer */}\n    <p>keep</p>\n</div>\n"
        );
    }

    #[test]
    fn test_tag_end_skips_quotes_and_braces() {
        let src = r#"<div title="a > b" style={{ x: 1 }} onClick={() => f()}>rest"#;
        assert_eq!(tag_end(src, 0), Some(src.len() - "rest".len() - 1));
    }

    #[test]
    fn test_open_missing_and_save() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("app.ts");
        assert!(SourceFile::open(&path)?.is_none());

        fs::write(&path, "import passport from 'passport';\nconst app = 1;\n")?;
        let mut f = SourceFile::open(&path)?.expect("file exists");
        assert!(!f.save()?);
        f.remove_first("import passport from 'passport';\n");
        assert!(f.save()?);
        assert_eq!(fs::read_to_string(&path)?, "const app = 1;\n");
        Ok(())
    }
}
