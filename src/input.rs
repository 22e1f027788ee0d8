//! Plain-text graph input: a header line `<node count> <edge count>`, then
//! one `<u> <v>` line per edge with 0-based node ids. Blank lines and lines
//! starting with `#` are skipped.

use std::io::BufRead;

use thiserror::Error;

use crate::{Edge, Node};

#[derive(Error, Debug)]
pub enum InputError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("empty input")]
    Empty,

    #[error("invalid header `{0}`, expected `<nodes> <edges>`")]
    Header(String),

    #[error("invalid edge on line {line}: `{text}`")]
    Edge { line: usize, text: String },

    #[error("header announced {expected} edges, found {found}")]
    EdgeCount { expected: usize, found: usize },
}

fn parse_pair<T: std::str::FromStr>(line: &str) -> Option<(T, T)> {
    let mut fields = line.split_whitespace();
    let first = fields.next()?.parse().ok()?;
    let second = fields.next()?.parse().ok()?;
    if fields.next().is_some() {
        return None;
    }
    Some((first, second))
}

/// Reads a graph and returns its node list `0..n` and its edges. Node ranges
/// are checked later, when the graph is built.
pub fn parse_input(reader: impl BufRead) -> Result<(Vec<Node>, Vec<Edge>), InputError> {
    let mut lines = reader
        .lines()
        .enumerate()
        .map(|(i, line)| line.map(|line| (i + 1, line)))
        .filter(|line| match line {
            Ok((_, text)) => {
                let text = text.trim();
                !text.is_empty() && !text.starts_with('#')
            }
            Err(_) => true,
        });

    let (_, header) = lines.next().ok_or(InputError::Empty)??;
    let bad_header = || InputError::Header(header.trim().to_string());
    let (vertex_count, edge_count): (usize, usize) = parse_pair(&header).ok_or_else(bad_header)?;
    let vertex_count = Node::try_from(vertex_count).map_err(|_| bad_header())?;

    // The header is untrusted, only use it as a hint.
    let mut edges = Vec::with_capacity(edge_count.min(1 << 16));
    for line in lines {
        let (line, text) = line?;
        let edge = parse_pair(&text).ok_or_else(|| InputError::Edge {
            line,
            text: text.trim().to_string(),
        })?;
        edges.push(edge);
    }
    if edges.len() != edge_count {
        return Err(InputError::EdgeCount {
            expected: edge_count,
            found: edges.len(),
        });
    }
    Ok(((0..vertex_count).collect(), edges))
}
