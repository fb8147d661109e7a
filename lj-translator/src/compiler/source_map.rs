use std::ops::Range;

/// Byte range in the text handed to the parser.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Span {
    pub lo: usize,
    pub hi: usize,
}

impl Span {
    pub fn new(lo: usize, hi: usize) -> Self {
        if lo <= hi {
            Self { lo, hi }
        } else {
            Self { lo: hi, hi: lo }
        }
    }

    pub fn len(self) -> usize {
        self.hi.saturating_sub(self.lo)
    }

    pub fn is_empty(self) -> bool {
        self.lo == self.hi
    }
}

/// A named Lua chunk with a line index for diagnostics.
#[derive(Clone, Debug)]
pub struct SourceFile {
    pub name: String,
    pub text: String,
    line_starts: Vec<usize>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let line_starts = compute_line_starts(&text);
        Self {
            name: name.into(),
            text,
            line_starts,
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    pub fn line_col_for_offset(&self, offset: usize) -> Option<(usize, usize)> {
        if offset > self.text.len() {
            return None;
        }
        let line_idx = line_index_for_offset(&self.line_starts, offset)?;
        let line_start = self.line_starts[line_idx];
        let col = self.text.get(line_start..offset)?.chars().count() + 1;
        Some((line_idx + 1, col))
    }

    pub fn line_span(&self, line: usize) -> Option<Range<usize>> {
        if line == 0 || line > self.line_starts.len() {
            return None;
        }
        let idx = line - 1;
        let start = self.line_starts[idx];
        let end = self
            .line_starts
            .get(idx + 1)
            .copied()
            .unwrap_or(self.text.len());
        let line_text = &self.text[start..end];
        let trimmed_end = line_text.trim_end_matches(['\n', '\r']).len();
        Some(start..start + trimmed_end)
    }

    pub fn line_text(&self, line: usize) -> Option<&str> {
        let range = self.line_span(line)?;
        self.text.get(range)
    }

    pub fn span_text(&self, span: Span) -> Option<&str> {
        self.text.get(span.lo..span.hi)
    }
}

fn compute_line_starts(text: &str) -> Vec<usize> {
    let mut starts = vec![0usize];
    for (idx, ch) in text.char_indices() {
        if ch == '\n' {
            starts.push(idx + 1);
        }
    }
    starts
}

fn line_index_for_offset(line_starts: &[usize], offset: usize) -> Option<usize> {
    if line_starts.is_empty() {
        return None;
    }
    Some(line_starts.partition_point(|start| *start <= offset).saturating_sub(1))
}
