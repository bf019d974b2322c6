//! Splits a handler's documentation into help summary and body.

/// Help text derived from a documentation string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocParts {
    /// First line, trimmed.
    pub title: String,
    /// Remaining lines, dedented and trimmed.
    pub body: String,
}

impl DocParts {
    /// Splits `doc` on its first line break. Absent or empty input yields empty parts.
    pub fn parse(doc: Option<&str>) -> Self {
        let Some(doc) = doc.filter(|doc| !doc.is_empty()) else {
            return Self::default();
        };
        match doc.split_once('\n') {
            Some((title, rest)) => Self {
                title: title.trim().to_string(),
                body: dedent(rest).trim().to_string(),
            },
            None => Self {
                title: doc.trim().to_string(),
                body: String::new(),
            },
        }
    }
}

/// Removes the leading whitespace shared by every non-blank line.
///
/// Whitespace-only lines are emptied and ignored when computing the margin.
pub fn dedent(text: &str) -> String {
    let margin = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| &line[..line.len() - line.trim_start_matches([' ', '\t']).len()])
        .reduce(common_prefix)
        .unwrap_or("");

    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                ""
            } else {
                &line[margin.len()..]
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let len = a
        .bytes()
        .zip(b.bytes())
        .take_while(|(x, y)| x == y)
        .count();
    &a[..len]
}
