/// Program text split into instruction lines.
///
/// Line numbers are 1-based for human-readable diagnostics. Lines are
/// split on `\n`, `\r\n` and a lone `\r`; a trailing terminator does not
/// produce an extra empty line, and an empty source has no lines at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub name: String,
    pub source: String,
    lines: Vec<String>,
}

impl Program {
    /// Create a new program from its source text.
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        let source = source.into();
        let lines = split_lines(&source);
        Self {
            name: name.into(),
            source,
            lines,
        }
    }

    /// Extract a source line by 1-based line number.
    ///
    /// Returns `None` if the line number is out of range.
    pub fn line(&self, line_number: u32) -> Option<&str> {
        let idx = line_number.checked_sub(1)? as usize;
        self.lines.get(idx).map(String::as_str)
    }

    /// Line at a 0-based instruction pointer.
    pub fn fetch(&self, ip: usize) -> Option<&str> {
        self.lines.get(ip).map(String::as_str)
    }

    /// Get the total number of lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }
}

fn split_lines(source: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut rest = source;
    while !rest.is_empty() {
        match rest.find(['\n', '\r']) {
            Some(idx) => {
                lines.push(rest[..idx].to_string());
                let width = if rest[idx..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[idx + width..];
            }
            None => {
                lines.push(rest.to_string());
                break;
            }
        }
    }
    lines
}
