use std::fmt::{self, Write};

use bitvec::prelude::*;

use crate::Node;

/// The nodes chosen to cover every edge, in the order the search picked them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cover {
    vertices: Vec<Node>,
}

impl Cover {
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn contains(&self, node: Node) -> bool {
        self.vertices.contains(&node)
    }

    pub fn vertices(&self) -> &[Node] {
        &self.vertices
    }

    pub fn into_vec(self) -> Vec<Node> {
        self.vertices
    }

    /// Size on the first line, then one node per line.
    pub fn format(&self) -> String {
        let mut output = String::new();
        let _ = writeln!(&mut output, "{}", self.vertices.len());
        for vertex in &self.vertices {
            let _ = writeln!(&mut output, "{}", vertex);
        }
        output
    }
}

impl From<Vec<Node>> for Cover {
    fn from(vertices: Vec<Node>) -> Self {
        Cover { vertices }
    }
}

impl From<&BitSlice> for Cover {
    fn from(value: &BitSlice) -> Self {
        Cover {
            vertices: value.iter_ones().map(|x| x as Node).collect(),
        }
    }
}

impl fmt::Display for Cover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.vertices)
    }
}
