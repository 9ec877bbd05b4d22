//! Builds a fragment tree from tokenized markup.

use crate::tokenizer::tokenize;
use crate::types::{Id, Node, Token};

/// Parse markup text into a `Document`-rooted fragment.
///
/// The returned document node is a fragment container: its children are the
/// top-level parsed nodes. Node ids are all [`Id::UNSET`] until the caller
/// assigns them (see [`crate::traverse::assign_node_ids`]).
///
/// Mis-nested end tags pop open elements to the nearest matching name;
/// unmatched end tags are dropped.
pub fn parse_fragment(input: &str) -> Node {
    let tokens = tokenize(input);

    let mut root = Node::Document {
        id: Id::UNSET,
        children: Vec::new(),
    };
    // Path of open elements, as child-index routes from the root.
    let mut open_path: Vec<usize> = Vec::new();

    fn node_at_path<'a>(root: &'a mut Node, path: &[usize]) -> &'a mut Node {
        let mut current = root;
        for &index in path {
            current = &mut current
                .children_mut()
                .expect("open path traverses container nodes")[index];
        }
        current
    }

    for token in tokens {
        match token {
            Token::Doctype(_) => {
                // Fragments carry no doctype; the surrounding document owns it.
                log::trace!(target: "markup.builder", "dropping doctype token in fragment");
            }
            Token::Comment(text) => {
                let parent = node_at_path(&mut root, &open_path);
                parent
                    .children_mut()
                    .expect("parent is a container")
                    .push(Node::Comment {
                        id: Id::UNSET,
                        text,
                    });
            }
            Token::Text(text) => {
                if text.is_empty() {
                    continue;
                }
                let parent = node_at_path(&mut root, &open_path);
                parent
                    .children_mut()
                    .expect("parent is a container")
                    .push(Node::Text {
                        id: Id::UNSET,
                        text,
                    });
            }
            Token::StartTag {
                name,
                attributes,
                self_closing,
            } => {
                let parent = node_at_path(&mut root, &open_path);
                let children = parent.children_mut().expect("parent is a container");
                children.push(Node::Element {
                    id: Id::UNSET,
                    name,
                    attributes,
                    children: Vec::new(),
                });
                if !self_closing {
                    let index = children.len() - 1;
                    open_path.push(index);
                }
            }
            Token::EndTag(name) => {
                // Pop to the nearest open element with this name, if any.
                let mut matched_depth = None;
                for depth in (0..open_path.len()).rev() {
                    let node = node_at_path(&mut root, &open_path[..depth + 1]);
                    if node.name().is_some_and(|n| n.eq_ignore_ascii_case(&name)) {
                        matched_depth = Some(depth);
                        break;
                    }
                }
                if let Some(depth) = matched_depth {
                    open_path.truncate(depth);
                }
            }
        }
    }

    root
}

#[cfg(test)]
mod tests {
    use super::*;

    fn child_names(node: &Node) -> Vec<&str> {
        node.children()
            .unwrap_or_default()
            .iter()
            .filter_map(|c| c.name())
            .collect()
    }

    #[test]
    fn parse_fragment_builds_sibling_elements() {
        let fragment = parse_fragment("<div></div><span></span>");
        assert_eq!(child_names(&fragment), vec!["div", "span"]);
    }

    #[test]
    fn parse_fragment_nests_children() {
        let fragment = parse_fragment("<ul><li>a</li><li>b</li></ul>");
        let ul = &fragment.children().unwrap()[0];
        assert_eq!(ul.name(), Some("ul"));
        assert_eq!(child_names(ul), vec!["li", "li"]);
    }

    #[test]
    fn parse_fragment_keeps_attributes() {
        let fragment = parse_fragment(r#"<div data-controller="menu" label="File"></div>"#);
        let div = &fragment.children().unwrap()[0];
        assert_eq!(div.attr("data-controller"), Some("menu"));
        assert_eq!(div.attr("label"), Some("File"));
    }

    #[test]
    fn parse_fragment_recovers_from_misnested_end_tag() {
        // </em> has no open element; it must not close <b>.
        let fragment = parse_fragment("<b>one</em>two</b>");
        let b = &fragment.children().unwrap()[0];
        assert_eq!(b.name(), Some("b"));
        let texts: Vec<&str> = b
            .children()
            .unwrap()
            .iter()
            .filter_map(|c| match c {
                Node::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["one", "two"]);
    }

    #[test]
    fn parse_fragment_end_tag_pops_intermediate_elements() {
        let fragment = parse_fragment("<div><span>x</div><p></p>");
        assert_eq!(child_names(&fragment), vec!["div", "p"]);
    }

    #[test]
    fn parse_fragment_all_ids_unset() {
        let fragment = parse_fragment("<div><span></span></div>");
        fn walk(node: &Node) {
            assert_eq!(node.id(), Id::UNSET);
            for c in node.children().unwrap_or_default() {
                walk(c);
            }
        }
        walk(&fragment);
    }
}
