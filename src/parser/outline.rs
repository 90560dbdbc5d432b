// file: src/parser/outline.rs
// description: table-of-contents tree built from the flat heading list

use crate::models::Heading;
use serde::Serialize;

pub const UNKNOWN_CHAPTER: &str = "未知章节";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlineNode {
    pub heading: Heading,
    pub children: Vec<OutlineNode>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Outline {
    pub roots: Vec<OutlineNode>,
}

impl Outline {
    /// Each heading nests under the closest preceding heading with a smaller level.
    pub fn build(headings: &[Heading]) -> Self {
        let mut roots: Vec<OutlineNode> = Vec::new();
        let mut stack: Vec<OutlineNode> = Vec::new();

        for heading in headings {
            while stack
                .last()
                .is_some_and(|open| open.heading.level >= heading.level)
            {
                attach(&mut stack, &mut roots);
            }
            stack.push(OutlineNode {
                heading: heading.clone(),
                children: Vec::new(),
            });
        }

        while !stack.is_empty() {
            attach(&mut stack, &mut roots);
        }

        Self { roots }
    }

    pub fn len(&self) -> usize {
        fn count(nodes: &[OutlineNode]) -> usize {
            nodes.iter().map(|n| 1 + count(&n.children)).sum()
        }
        count(&self.roots)
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Indented listing, two spaces per depth.
    pub fn render(&self) -> String {
        fn walk(nodes: &[OutlineNode], depth: usize, out: &mut String) {
            for node in nodes {
                out.push_str(&"  ".repeat(depth));
                out.push_str(&node.heading.text);
                out.push('\n');
                walk(&node.children, depth + 1, out);
            }
        }

        let mut out = String::new();
        walk(&self.roots, 0, &mut out);
        out
    }
}

fn attach(stack: &mut Vec<OutlineNode>, roots: &mut Vec<OutlineNode>) {
    if let Some(node) = stack.pop() {
        match stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => roots.push(node),
        }
    }
}

/// Text of the last level-1 heading at or before `position`.
pub fn parent_chapter(headings: &[Heading], position: usize) -> &str {
    headings
        .iter()
        .take_while(|h| h.position <= position)
        .filter(|h| h.level == 1)
        .last()
        .map(|h| h.text.as_str())
        .unwrap_or(UNKNOWN_CHAPTER)
}
