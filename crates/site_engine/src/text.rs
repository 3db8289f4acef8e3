use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::ElementRef;

/// Elements whose contents never count as visible text.
const HIDDEN_TAGS: &[&str] = &["script", "style", "noscript", "template"];

pub(crate) fn is_hidden(element: &ElementRef) -> bool {
    let name = element.value().name();
    HIDDEN_TAGS.iter().any(|tag| name.eq_ignore_ascii_case(tag))
}

/// Trimmed, non-empty text runs below `node`, in document order.
pub(crate) fn text_runs(node: NodeRef<'_, Node>) -> Vec<String> {
    let mut runs = Vec::new();
    collect_runs(node, &mut runs);
    runs
}

fn collect_runs(node: NodeRef<'_, Node>, runs: &mut Vec<String>) {
    match node.value() {
        Node::Text(text) => {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                runs.push(trimmed.to_string());
            }
        }
        Node::Element(_) => {
            if let Some(element) = ElementRef::wrap(node) {
                if is_hidden(&element) {
                    return;
                }
            }
            for child in node.children() {
                collect_runs(child, runs);
            }
        }
        Node::Comment(_) | Node::ProcessingInstruction(_) | Node::Doctype(_) => {}
        _ => {
            for child in node.children() {
                collect_runs(child, runs);
            }
        }
    }
}

/// Visible text of an element on one line, whitespace collapsed.
pub(crate) fn compact_text(element: ElementRef<'_>) -> String {
    text_runs(*element)
        .iter()
        .flat_map(|run| run.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

/// First `max_chars` characters, never splitting a code point.
pub(crate) fn preview(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
