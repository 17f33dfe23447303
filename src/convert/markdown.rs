//! Default structural rules: CommonMark plus the GFM table and strikethrough extensions.
//!
//! These run after the form and link rules. The table ends with two catch-alls, one for block
//! elements and one for everything else, so every element finds a rule.

use super::forms::collapse_whitespace;
use super::{is_block, Options, Rule};
use crate::document::{NodeId, NodeRef};

#[must_use]
/// Structural rules in priority order, ending with the block and inline fallbacks.
pub fn rules() -> Vec<Rule> {
    vec![
        Rule {
            name: "remove",
            filter: |node| node.is(&["script", "style", "noscript", "template", "head"]),
            replacement: |_, _, _| String::new(),
        },
        Rule {
            name: "heading",
            filter: |node| node.is(&["h1", "h2", "h3", "h4", "h5", "h6"]),
            replacement: heading,
        },
        Rule {
            name: "paragraph",
            filter: |node| node.is(&["p"]),
            replacement: |content, _, _| block(content),
        },
        Rule {
            name: "line-break",
            filter: |node| node.is(&["br"]),
            replacement: |_, _, _| "  \n".to_string(),
        },
        Rule {
            name: "horizontal-rule",
            filter: |node| node.is(&["hr"]),
            replacement: |_, _, _| "\n\n---\n\n".to_string(),
        },
        Rule {
            name: "emphasis",
            filter: |node| node.is(&["em", "i"]),
            replacement: |content, _, _| delimit(content, "_"),
        },
        Rule {
            name: "strong",
            filter: |node| node.is(&["strong", "b"]),
            replacement: |content, _, _| delimit(content, "**"),
        },
        Rule {
            name: "strikethrough",
            filter: |node| node.is(&["del", "s", "strike"]),
            replacement: |content, _, _| delimit(content, "~~"),
        },
        Rule {
            name: "code-block",
            filter: |node| node.is(&["pre"]),
            replacement: code_block,
        },
        Rule {
            name: "inline-code",
            filter: |node| {
                node.is(&["code"]) && !node.parent_element().is_some_and(|p| p.is(&["pre"]))
            },
            replacement: inline_code,
        },
        Rule {
            name: "blockquote",
            filter: |node| node.is(&["blockquote"]),
            replacement: blockquote,
        },
        Rule {
            name: "list",
            filter: |node| node.is(&["ul", "ol"]),
            replacement: list,
        },
        Rule {
            name: "list-item",
            filter: |node| node.is(&["li"]),
            replacement: list_item,
        },
        Rule {
            name: "image",
            filter: |node| node.is(&["img"]),
            replacement: image,
        },
        Rule {
            name: "table-cell",
            filter: |node| node.is(&["th", "td"]),
            replacement: |content, _, _| {
                format!(" {} |", collapse_whitespace(content).replace('|', "\\|"))
            },
        },
        Rule {
            name: "table-row",
            filter: |node| node.is(&["tr"]),
            replacement: table_row,
        },
        Rule {
            name: "table-section",
            filter: |node| node.is(&["thead", "tbody", "tfoot"]),
            replacement: |content, _, _| content.to_string(),
        },
        Rule {
            name: "table",
            filter: |node| node.is(&["table"]),
            replacement: |content, _, _| block(content),
        },
        Rule {
            name: "block",
            filter: |node| node.tag().is_some_and(is_block),
            replacement: |content, _, _| block(content),
        },
        Rule {
            name: "inline",
            filter: |_| true,
            replacement: |content, _, _| content.to_string(),
        },
    ]
}

/// Surrounds content with blank lines; blank content vanishes.
fn block(content: &str) -> String {
    let inner = content.trim_matches('\n');
    if inner.trim().is_empty() {
        String::new()
    } else {
        format!("\n\n{inner}\n\n")
    }
}

/// Wraps content in `delimiter`, keeping edge whitespace outside the markers.
fn delimit(content: &str, delimiter: &str) -> String {
    let core = content.trim();
    if core.is_empty() {
        return content.to_string();
    }
    let lead = &content[..content.len() - content.trim_start().len()];
    let trail = &content[content.trim_end().len()..];
    format!("{lead}{delimiter}{core}{delimiter}{trail}")
}

fn heading(content: &str, node: NodeRef<'_>, _options: &Options) -> String {
    let level = node
        .tag()
        .and_then(|t| t[1..].parse::<usize>().ok())
        .unwrap_or(1);
    let text = collapse_whitespace(content);
    if text.is_empty() {
        return String::new();
    }
    format!("\n\n{} {text}\n\n", "#".repeat(level))
}

fn code_block(_content: &str, node: NodeRef<'_>, options: &Options) -> String {
    let code = node.text_content();
    let code = code.strip_suffix('\n').unwrap_or(&code);
    let language = node
        .doc
        .first_element_child(node.id)
        .filter(|&c| node.doc.tag(c) == Some("code"))
        .and_then(|c| node.doc.attr(c, "class"))
        .and_then(|classes| {
            classes
                .split_whitespace()
                .find_map(|c| c.strip_prefix("language-").or_else(|| c.strip_prefix("lang-")))
        })
        .unwrap_or_default();
    let fence = fence_for(code, &options.code_fence);
    format!("\n\n{fence}{language}\n{code}\n{fence}\n\n")
}

/// Lengthens the configured fence until it cannot be confused with a line of `code`.
fn fence_for(code: &str, configured: &str) -> String {
    let fence_char = configured.chars().next().unwrap_or('`');
    let longest = code
        .lines()
        .map(|line| {
            line.trim_start()
                .chars()
                .take_while(|&c| c == fence_char)
                .count()
        })
        .max()
        .unwrap_or(0);
    let width = configured.chars().count().max(longest + 1).max(3);
    std::iter::repeat_n(fence_char, width).collect()
}

fn inline_code(_content: &str, node: NodeRef<'_>, _options: &Options) -> String {
    let code = node.text_content();
    if code.is_empty() {
        return String::new();
    }
    let mut longest = 0;
    let mut run = 0;
    for c in code.chars() {
        if c == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    let delimiter = "`".repeat(longest + 1);
    let pad = if code.starts_with('`') || code.ends_with('`') {
        " "
    } else {
        ""
    };
    format!("{delimiter}{pad}{code}{pad}{delimiter}")
}

fn blockquote(content: &str, _node: NodeRef<'_>, _options: &Options) -> String {
    let inner = content.trim_matches('\n');
    if inner.trim().is_empty() {
        return String::new();
    }
    let quoted = inner
        .lines()
        .map(|line| {
            if line.is_empty() {
                ">".to_string()
            } else {
                format!("> {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!("\n\n{quoted}\n\n")
}

fn list(content: &str, node: NodeRef<'_>, _options: &Options) -> String {
    let inner = content.trim_matches('\n');
    if inner.trim().is_empty() {
        return String::new();
    }
    if node.parent_element().is_some_and(|p| p.is(&["li"])) {
        format!("\n{inner}\n")
    } else {
        format!("\n\n{inner}\n\n")
    }
}

fn list_item(content: &str, node: NodeRef<'_>, options: &Options) -> String {
    let prefix = match node.parent_element() {
        Some(parent) if parent.is(&["ol"]) => {
            let start = parent
                .attr("start")
                .and_then(|s| s.trim().parse::<i64>().ok())
                .unwrap_or(1);
            let position = sibling_position(node, parent.id);
            let number = start.saturating_add(i64::try_from(position).unwrap_or(i64::MAX));
            format!("{number}. ")
        }
        _ => format!("{} ", options.bullet_marker),
    };
    let body = content
        .trim_matches('\n')
        .lines()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 || line.is_empty() {
                line.to_string()
            } else {
                format!("    {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n");
    let separator = if node.doc.next_element_sibling(node.id).is_some() {
        "\n"
    } else {
        ""
    };
    format!("{prefix}{}{separator}", body.trim_start())
}

/// Zero-based index of `node` among the `li` children of `parent`.
fn sibling_position(node: NodeRef<'_>, parent: NodeId) -> usize {
    node.doc
        .element_children(parent)
        .filter(|&c| node.doc.tag(c) == Some("li"))
        .position(|c| c == node.id)
        .unwrap_or(0)
}

fn image(_content: &str, node: NodeRef<'_>, _options: &Options) -> String {
    let Some(src) = node.attr("src").filter(|s| !s.is_empty()) else {
        return String::new();
    };
    let alt = collapse_whitespace(node.attr("alt").unwrap_or_default());
    let title = node
        .attr("title")
        .filter(|t| !t.is_empty())
        .map(|t| format!(" \"{}\"", t.replace('"', "\\\"")))
        .unwrap_or_default();
    format!("![{alt}]({src}{title})")
}

fn table_row(content: &str, node: NodeRef<'_>, _options: &Options) -> String {
    let cells = node
        .doc
        .element_children(node.id)
        .filter(|&c| matches!(node.doc.tag(c), Some("th" | "td")))
        .count();
    if cells == 0 {
        return String::new();
    }
    let mut row = format!("\n|{}", content.trim_matches('\n'));
    if is_first_row(node) {
        row.push_str("\n|");
        row.push_str(&" --- |".repeat(cells));
    }
    row.push('\n');
    row
}

/// True when `node` is the first `tr` of its enclosing table.
fn is_first_row(node: NodeRef<'_>) -> bool {
    let mut cursor = node.parent_element();
    while let Some(ancestor) = cursor {
        if ancestor.is(&["table"]) {
            return node
                .doc
                .descendants(ancestor.id)
                .into_iter()
                .find(|&d| node.doc.tag(d) == Some("tr"))
                == Some(node.id);
        }
        cursor = ancestor.parent_element();
    }
    false
}

#[cfg(test)]
#[path = "../tests/markdown.rs"]
mod tests;
