//! Placeholder substitution for document templates.
//!
//! Syntax: `{name}` inserts a value, `{#list}...{/list}` repeats its body for each
//! element of an array (or once for `true`/an object, never for `false`/`null`/`[]`).
//! Names may be dotted (`{meeting.number}`) and are looked up from the innermost
//! loop item outwards. Anything in braces that is not a valid name is left as text.

use serde_json::Value;

use crate::errors::AppError;

#[derive(Debug, PartialEq)]
enum Node {
    Text(String),
    Var(String),
    Section(String, Vec<Node>),
}

fn is_name(s: &str) -> bool {
    !s.is_empty()
        && s.split('.').all(|part| {
            !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}

/// Classify the content between braces. `None` means "not a placeholder".
fn tag_kind(inner: &str) -> Option<(char, &str)> {
    let (kind, name) = match inner.chars().next()? {
        '#' => ('#', &inner[1..]),
        '/' => ('/', &inner[1..]),
        _ => (' ', inner),
    };
    is_name(name).then_some((kind, name))
}

/// Word frequently splits `{name}` over several runs. Drop the markup that sits
/// between the braces of anything that reads as a placeholder once the tags are gone.
pub fn merge_split_placeholders(xml: &str) -> String {
    const MAX_SPAN: usize = 4096;
    let mut out = String::with_capacity(xml.len());
    let mut rest = xml;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let candidate = &rest[open..];
        let mut cut = candidate.len().min(MAX_SPAN);
        while !candidate.is_char_boundary(cut) {
            cut -= 1;
        }
        let window = &candidate[..cut];

        let mut text = String::new();
        let mut in_tag = false;
        let mut close_at = None;
        for (i, c) in window.char_indices().skip(1) {
            match c {
                '<' => in_tag = true,
                '>' if in_tag => in_tag = false,
                '}' if !in_tag => {
                    close_at = Some(i);
                    break;
                }
                '{' if !in_tag => break,
                _ if !in_tag => text.push(c),
                _ => {}
            }
        }

        match close_at {
            Some(end) if tag_kind(&text).is_some() => {
                out.push('{');
                out.push_str(&text);
                out.push('}');
                rest = &candidate[end + 1..];
            }
            _ => {
                out.push('{');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn parse(template: &str) -> Result<Vec<Node>, AppError> {
    let mut root: Vec<Node> = Vec::new();
    // Open sections: (section name, nodes collected so far).
    let mut stack: Vec<(String, Vec<Node>)> = Vec::new();
    let mut text = String::new();
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        text.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let tag = after.find('}').and_then(|close| tag_kind(&after[..close]).map(|t| (t, close)));

        let Some(((kind, name), close)) = tag else {
            text.push('{');
            rest = after;
            continue;
        };
        rest = &after[close + 1..];

        let nodes = stack.last_mut().map_or(&mut root, |(_, body)| body);
        if !text.is_empty() {
            nodes.push(Node::Text(std::mem::take(&mut text)));
        }
        match kind {
            '#' => stack.push((name.to_string(), Vec::new())),
            '/' => match stack.pop() {
                Some((open, body)) if open == name => {
                    stack.last_mut().map_or(&mut root, |(_, body)| body).push(Node::Section(open, body));
                }
                _ => {
                    return Err(AppError::Export(format!("Unexpected closing tag {{/{name}}} in template")));
                }
            },
            _ => nodes.push(Node::Var(name.to_string())),
        }
    }
    text.push_str(rest);

    if let Some((open, _)) = stack.pop() {
        return Err(AppError::Export(format!("Section {{#{open}}} is never closed in template")));
    }
    if !text.is_empty() {
        root.push(Node::Text(text));
    }
    Ok(root)
}

fn lookup<'a>(scopes: &[&'a Value], name: &str) -> Option<&'a Value> {
    scopes.iter().rev().find_map(|scope| {
        name.split('.')
            .try_fold(*scope, |value, key| value.get(key))
    })
}

/// Characters allowed in an XML 1.0 document.
pub fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\t' | '\n' | '\r'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

/// Escape markup characters and drop anything XML cannot carry.
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars().filter(|c| is_xml_char(*c)) {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn render_nodes(
    nodes: &[Node],
    scopes: &mut Vec<&Value>,
    line_break: &str,
    out: &mut String,
) -> Result<(), AppError> {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Var(name) => {
                let value = lookup(scopes, name)
                    .ok_or_else(|| AppError::Export(format!("Template placeholder {{{name}}} has no value")))?;
                let text = match value {
                    Value::Null => String::new(),
                    Value::String(s) => s.clone(),
                    Value::Bool(b) => b.to_string(),
                    Value::Number(n) => n.to_string(),
                    Value::Array(_) | Value::Object(_) => {
                        return Err(AppError::Export(format!(
                            "Template placeholder {{{name}}} refers to a list; use {{#{name}}}"
                        )));
                    }
                };
                let escaped: Vec<String> = text.split('\n').map(escape_xml).collect();
                out.push_str(&escaped.join(line_break));
            }
            Node::Section(name, body) => {
                let value = lookup(scopes, name)
                    .ok_or_else(|| AppError::Export(format!("Template section {{#{name}}} has no value")))?;
                match value {
                    Value::Array(items) => {
                        for item in items {
                            scopes.push(item);
                            render_nodes(body, scopes, line_break, out)?;
                            scopes.pop();
                        }
                    }
                    Value::Object(_) => {
                        scopes.push(value);
                        render_nodes(body, scopes, line_break, out)?;
                        scopes.pop();
                    }
                    Value::Bool(true) => render_nodes(body, scopes, line_break, out)?,
                    _ => {}
                }
            }
        }
    }
    Ok(())
}

/// Render `template` against `context`. Newlines inside values are replaced
/// by `line_break` after escaping.
pub fn render(template: &str, context: &Value, line_break: &str) -> Result<String, AppError> {
    let nodes = parse(template)?;
    let mut out = String::with_capacity(template.len());
    let mut scopes = vec![context];
    render_nodes(&nodes, &mut scopes, line_break, &mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn substitutes_and_escapes_scalars() {
        let out = render("No {nomor}: {judul}", &json!({"nomor": 7, "judul": "R&D <baru>"}), "\n").unwrap();
        assert_eq!(out, "No 7: R&amp;D &lt;baru&gt;");
    }

    #[test]
    fn characters_illegal_in_xml_are_dropped() {
        assert_eq!(escape_xml("a\u{0}b\u{0B}c\td\u{FFFE}"), "abc\td");
        let out = render("{judul}", &json!({"judul": "Rapat\u{1}Direksi"}), "\n").unwrap();
        assert_eq!(out, "RapatDireksi");
    }

    #[test]
    fn loops_fall_back_to_outer_scope() {
        let ctx = json!({
            "tahun": 2026,
            "agenda": [{"judul": "A"}, {"judul": "B"}],
        });
        let out = render("{#agenda}[{judul}/{tahun}]{/agenda}", &ctx, "\n").unwrap();
        assert_eq!(out, "[A/2026][B/2026]");
    }

    #[test]
    fn nested_sections_and_dotted_names() {
        let ctx = json!({
            "rapat": {"nomor": 3},
            "agenda": [{"judul": "A", "keputusan": [{"teks": "x"}, {"teks": "y"}]}],
            "ada": false,
        });
        let tpl = "{rapat.nomor}|{#agenda}{judul}:{#keputusan}{teks};{/keputusan}{/agenda}|{#ada}never{/ada}";
        assert_eq!(render(tpl, &ctx, "\n").unwrap(), "3|A:x;y;|");
    }

    #[test]
    fn newlines_use_line_break_markup() {
        let out = render("{catatan}", &json!({"catatan": "a\nb"}), "<w:br/>").unwrap();
        assert_eq!(out, "a<w:br/>b");
    }

    #[test]
    fn non_placeholder_braces_are_kept() {
        let out = render("{ not a tag } {}", &json!({}), "\n").unwrap();
        assert_eq!(out, "{ not a tag } {}");
    }

    #[test]
    fn unknown_or_unbalanced_tags_fail() {
        assert!(render("{missing}", &json!({}), "\n").is_err());
        assert!(render("{#items}x", &json!({"items": []}), "\n").is_err());
        assert!(render("x{/items}", &json!({}), "\n").is_err());
        assert!(render("{#a}{/b}", &json!({"a": true}), "\n").is_err());
    }

    #[test]
    fn merges_placeholders_split_across_runs() {
        let xml = "<w:t>{nomor</w:t></w:r><w:r><w:t>_rapat}</w:t><w:t>{ x }</w:t>";
        assert_eq!(
            merge_split_placeholders(xml),
            "<w:t>{nomor_rapat}</w:t><w:t>{ x }</w:t>"
        );
    }
}
