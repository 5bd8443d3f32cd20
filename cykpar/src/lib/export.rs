#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::tree::Node;

/// The generic labeled-tree shape consumed by external renderers: a label and
/// an ordered list of zero, one, or two children, each recursively of the
/// same shape. This is deliberately free of grammar-specific detail so that
/// arbitrary tree-drawing widgets (or the ASCII fallback, [`Node::pp`]) can
/// consume it.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GenericTree {
    pub label: String,
    pub children: Vec<GenericTree>,
}

impl From<&Node> for GenericTree {
    fn from(n: &Node) -> Self {
        match n {
            Node::Term { token } => GenericTree {
                label: token.clone(),
                children: Vec::new(),
            },
            Node::Nonterm { name, nodes } => GenericTree {
                label: name.clone(),
                children: nodes.iter().map(GenericTree::from).collect(),
            },
        }
    }
}
