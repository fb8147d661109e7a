use super::ParseError;
use super::source_map::{SourceFile, Span};

/// Renders a parse error with a caret snippet when the error carries a span.
pub fn render_source_error(file: &SourceFile, err: &ParseError) -> String {
    if let Some(span) = err.span
        && let Some(rendered) = render_span_snippet(file, span, &err.message)
    {
        return format!("error: {}", rendered.trim_end());
    }

    format!("error: {}:{}: {}", file.name, err.line, err.message)
}

fn render_span_snippet(file: &SourceFile, span: Span, message: &str) -> Option<String> {
    let (line, col) = file.line_col_for_offset(span.lo)?;
    let line_text = file.line_text(line)?;
    let pointer_width = span.len().max(1);
    let pointer = format!(
        "{}{}",
        " ".repeat(col.saturating_sub(1)),
        "^".repeat(pointer_width)
    );
    Some(format!(
        "{message}\n --> {}:{line}:{col}\n  |\n{line:>3} | {line_text}\n  | {pointer}",
        file.name
    ))
}
