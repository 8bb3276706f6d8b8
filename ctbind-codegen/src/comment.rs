//! Rendering of C comments as Python comments.

use ctbind_ast::Token;

const TAB_WIDTH: usize = 8;

/// The text lines of a comment token, without comment markers.
///
/// Delimiters and ` *` continuation markers are stripped. The token's
/// column is restored as leading space before the common indentation is
/// removed, so continuation lines keep their position relative to the
/// first line. Leading and trailing blank lines are dropped.
pub fn comment_text(token: &Token) -> Vec<String> {
    let spelling = token.spelling.as_str();
    let (body, is_block) = if let Some(rest) = spelling.strip_prefix("/*") {
        let rest = rest.strip_suffix("*/").unwrap_or(rest);
        (rest.strip_prefix(['*', '!']).unwrap_or(rest), true)
    } else if let Some(rest) = spelling.strip_prefix("//") {
        (rest.strip_prefix(['/', '!']).unwrap_or(rest), false)
    } else {
        (spelling, false)
    };

    let pad = " ".repeat(token.extent.start.column.saturating_sub(1) as usize);
    let star = format!("{pad} *");
    let padded = format!("{pad}{body}");
    let lines: Vec<String> = padded
        .lines()
        .enumerate()
        .map(|(index, line)| {
            let line = match line.strip_prefix(star.as_str()) {
                Some(rest) if is_block && index > 0 => format!("{pad}  {rest}"),
                _ => line.to_string(),
            };
            expand_tabs(line.trim_end())
        })
        .collect();
    clean_indentation(lines)
}

/// A comment as Python comment lines, ready to be indented.
///
/// Empty comments yield no lines.
pub fn python_comment(token: &Token) -> Vec<String> {
    comment_text(token)
        .iter()
        .map(|line| prefixed(line))
        .collect()
}

/// `code` followed by a trailing comment.
///
/// Continuation lines of a multi-line comment start with `#` at the code's
/// indentation and align their text under the first comment line.
pub fn with_right_comment(code: &str, token: &Token) -> Vec<String> {
    let mut text = comment_text(token).into_iter();
    let Some(first) = text.next() else {
        return vec![code.to_string()];
    };
    let mut lines = vec![format!("{code}  # {first}")];
    let gap = " ".repeat(code.chars().count() + 3);
    lines.extend(text.map(|line| format!("#{gap}{line}")));
    lines
}

fn prefixed(line: &str) -> String {
    if line.is_empty() {
        "#".to_string()
    } else {
        format!("# {line}")
    }
}

/// Drop the first line's leading whitespace and the common leading
/// whitespace of the remaining lines, then trim blank lines at both ends.
fn clean_indentation(mut lines: Vec<String>) -> Vec<String> {
    let margin = lines
        .iter()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.chars().take_while(|c| c.is_whitespace()).count())
        .min();

    for (index, line) in lines.iter_mut().enumerate() {
        if index == 0 {
            *line = line.trim_start().to_string();
        } else if let Some(margin) = margin {
            *line = line.chars().skip(margin).collect();
        }
    }

    let start = lines.iter().position(|line| !line.is_empty());
    let end = lines.iter().rposition(|line| !line.is_empty());
    match (start, end) {
        (Some(start), Some(end)) => lines.drain(start..=end).collect(),
        _ => Vec::new(),
    }
}

fn expand_tabs(line: &str) -> String {
    if !line.contains('\t') {
        return line.to_string();
    }
    let mut expanded = String::with_capacity(line.len());
    let mut column = 0;
    for c in line.chars() {
        if c == '\t' {
            let width = TAB_WIDTH - column % TAB_WIDTH;
            expanded.extend(std::iter::repeat_n(' ', width));
            column += width;
        } else {
            expanded.push(c);
            column += 1;
        }
    }
    expanded
}
