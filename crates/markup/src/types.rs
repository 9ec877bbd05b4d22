pub type NodeId = u32;

/// Stable node identity. `Id(0)` means "not yet assigned"; the engine
/// assigns ids after every fragment insertion (see [`crate::traverse::assign_node_ids`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Id(pub NodeId);

impl Id {
    pub const UNSET: Id = Id(0);
}

#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Doctype(String),
    StartTag {
        name: String,
        attributes: Vec<(String, Option<String>)>,
        self_closing: bool,
    },
    EndTag(String),
    Comment(String),
    Text(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Document {
        id: Id,
        children: Vec<Node>,
    },
    Element {
        id: Id,
        name: String,
        attributes: Vec<(String, Option<String>)>,
        children: Vec<Node>,
    },
    Text {
        id: Id,
        text: String,
    },
    Comment {
        id: Id,
        text: String,
    },
}

impl Node {
    pub fn id(&self) -> Id {
        match self {
            Node::Document { id, .. } => *id,
            Node::Element { id, .. } => *id,
            Node::Text { id, .. } => *id,
            Node::Comment { id, .. } => *id,
        }
    }

    pub fn set_id(&mut self, new_id: Id) {
        match self {
            Node::Document { id, .. } => *id = new_id,
            Node::Element { id, .. } => *id = new_id,
            Node::Text { id, .. } => *id = new_id,
            Node::Comment { id, .. } => *id = new_id,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element { .. })
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Node::Element { name, .. } => Some(name.as_str()),
            _ => None,
        }
    }

    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::Document { children, .. } | Node::Element { children, .. } => Some(children),
            _ => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Document { children, .. } | Node::Element { children, .. } => Some(children),
            _ => None,
        }
    }

    /// Value of the named attribute, if present with a value.
    ///
    /// Attribute names compare ASCII case-insensitively, matching how the
    /// tokenizer lowercases them on the way in.
    pub fn attr(&self, attr_name: &str) -> Option<&str> {
        match self {
            Node::Element { attributes, .. } => attributes
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(attr_name))
                .and_then(|(_, v)| v.as_deref()),
            _ => None,
        }
    }

    /// Whether the attribute is present at all, valueless included.
    pub fn has_attr(&self, attr_name: &str) -> bool {
        match self {
            Node::Element { attributes, .. } => attributes
                .iter()
                .any(|(k, _)| k.eq_ignore_ascii_case(attr_name)),
            _ => false,
        }
    }

    /// Set or replace an attribute value. No-op on non-element nodes.
    pub fn set_attr(&mut self, attr_name: &str, value: &str) {
        if let Node::Element { attributes, .. } = self {
            for (k, v) in attributes.iter_mut() {
                if k.eq_ignore_ascii_case(attr_name) {
                    *v = Some(value.to_string());
                    return;
                }
            }
            attributes.push((attr_name.to_string(), Some(value.to_string())));
        }
    }

    pub fn remove_attr(&mut self, attr_name: &str) {
        if let Node::Element { attributes, .. } = self {
            attributes.retain(|(k, _)| !k.eq_ignore_ascii_case(attr_name));
        }
    }
}
