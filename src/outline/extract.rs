//! Heading extraction and tree building

use super::OutlineNode;

/// Extract the heading tree from a Markdown buffer.
///
/// A heading is a line of 1 to 6 `#`, at least one whitespace character, and
/// non-empty text. Fenced code is not special-cased.
pub fn extract_outline(text: &str) -> Vec<OutlineNode> {
    let headings = text
        .lines()
        .enumerate()
        .filter_map(|(line, content)| {
            parse_heading(content).map(|(level, text)| (level, text.to_string(), line))
        })
        .collect();

    build_heading_tree(headings)
}

/// Parse a single line as an ATX heading, returning `(level, text)`
pub fn parse_heading(line: &str) -> Option<(u8, &str)> {
    let level = line.bytes().take_while(|&b| b == b'#').count();
    if !(1..=6).contains(&level) {
        return None;
    }

    let rest = &line[level..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }

    let text = rest.trim();
    if text.is_empty() {
        return None;
    }
    Some((level as u8, text))
}

/// Slug for a heading: lower-case, punctuation stripped, whitespace runs
/// become `-`, repeated dashes collapsed and trimmed. CJK ideographs are kept.
pub fn heading_anchor(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for ch in text.to_lowercase().chars() {
        if ch.is_whitespace() || ch == '-' {
            pending_dash = true;
        } else if ch.is_ascii_alphanumeric() || ch == '_' || is_cjk_ideograph(ch) {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        }
    }

    slug
}

fn is_cjk_ideograph(ch: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&ch)
}

fn build_heading_tree(headings: Vec<(u8, String, usize)>) -> Vec<OutlineNode> {
    let mut roots: Vec<OutlineNode> = Vec::new();
    let mut stack: Vec<OutlineNode> = Vec::new();

    for (level, text, line) in headings {
        let node = OutlineNode {
            level,
            anchor: heading_anchor(&text),
            text,
            line,
            children: Vec::new(),
        };

        // Pop everything at same level or deeper
        while stack.last().is_some_and(|top| top.level >= level) {
            if let Some(finished) = stack.pop() {
                attach(&mut stack, &mut roots, finished);
            }
        }

        stack.push(node);
    }

    // Flush remaining stack
    while let Some(finished) = stack.pop() {
        attach(&mut stack, &mut roots, finished);
    }

    roots
}

fn attach(stack: &mut [OutlineNode], roots: &mut Vec<OutlineNode>, node: OutlineNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => roots.push(node),
    }
}
