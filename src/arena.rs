use std::fmt;
use std::io::Write;

use generational_arena::Arena;
use termtree::Tree;
use tracing::instrument;

use crate::errors::{SceneError, SceneResult};

pub use generational_arena::Index;

/// Discriminates atomic shapes from groups.
///
/// The kind decides which structural operations a node supports, never
/// whether it can be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Line,
    Circle,
    Group,
}

impl ElementKind {
    /// Atomic elements cannot hold children.
    pub fn is_atomic(&self) -> bool {
        !matches!(self, ElementKind::Group)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Line => write!(f, "line"),
            ElementKind::Circle => write!(f, "circle"),
            ElementKind::Group => write!(f, "group"),
        }
    }
}

/// Data payload for scene nodes.
#[derive(Debug, Clone)]
pub struct Element {
    /// Display name, fixed at construction
    pub name: String,
    /// Shape or group discriminator
    pub kind: ElementKind,
}

impl Element {
    pub fn new(name: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Scene node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct ElementNode {
    /// Element data for this node
    pub element: Element,
    /// Most recent parent this node was attached to.
    ///
    /// Informational only: a node may sit in several groups' child lists at
    /// once, in which case this records the last attachment. Membership
    /// truth lives in the parents' `children` vectors.
    pub parent: Option<Index>,
    /// Handles of child nodes, in attachment order
    pub children: Vec<Index>,
}

/// Arena-based scene storage with stable element handles.
///
/// Uses a generational arena for memory-safe node references and O(1)
/// lookups. All elements, attached or detached, live in one arena; a
/// drawable tree is whatever is reachable from a given handle. Cycle
/// freedom is a caller obligation: `add_child` performs no cycle or
/// duplicate check, and `draw` on a cyclic structure will not terminate.
#[derive(Debug)]
pub struct SceneArena {
    arena: Arena<ElementNode>,
}

impl Default for SceneArena {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
        }
    }

    /// Create a detached node and return its handle.
    #[instrument(level = "trace", skip(self))]
    pub fn insert(&mut self, element: Element) -> Index {
        self.arena.insert(ElementNode {
            element,
            parent: None,
            children: Vec::new(),
        })
    }

    pub fn add_line(&mut self, name: impl Into<String>) -> Index {
        self.insert(Element::new(name, ElementKind::Line))
    }

    pub fn add_circle(&mut self, name: impl Into<String>) -> Index {
        self.insert(Element::new(name, ElementKind::Circle))
    }

    pub fn add_group(&mut self, name: impl Into<String>) -> Index {
        self.insert(Element::new(name, ElementKind::Group))
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get(&self, idx: Index) -> Option<&ElementNode> {
        self.arena.get(idx)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_mut(&mut self, idx: Index) -> Option<&mut ElementNode> {
        self.arena.get_mut(idx)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Append `child` to the end of `parent`'s child list.
    ///
    /// Uniform over node kinds: callable with any pair of handles, but an
    /// atomic parent fails with `UnsupportedOperation` without mutating
    /// anything. No duplicate check is performed; attaching the same child
    /// twice draws it twice.
    #[instrument(level = "debug", skip(self))]
    pub fn add_child(&mut self, parent: Index, child: Index) -> SceneResult<()> {
        if !self.arena.contains(child) {
            return Err(SceneError::StaleHandle(child));
        }
        let parent_node = self
            .arena
            .get(parent)
            .ok_or(SceneError::StaleHandle(parent))?;
        if parent_node.element.kind.is_atomic() {
            return Err(SceneError::UnsupportedOperation {
                op: "add",
                kind: parent_node.element.kind,
                name: parent_node.element.name.clone(),
            });
        }

        if let Some(node) = self.arena.get_mut(parent) {
            node.children.push(child);
        }
        if let Some(node) = self.arena.get_mut(child) {
            node.parent = Some(parent);
        }
        Ok(())
    }

    /// Remove the first occurrence of `child` from `parent`'s child list.
    ///
    /// Removing a handle that is not present is a silent no-op, mirroring
    /// remove-if-present list semantics. Only the wrong node kind is an
    /// error: an atomic parent fails with `UnsupportedOperation`.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_child(&mut self, parent: Index, child: Index) -> SceneResult<()> {
        let parent_node = self
            .arena
            .get(parent)
            .ok_or(SceneError::StaleHandle(parent))?;
        if parent_node.element.kind.is_atomic() {
            return Err(SceneError::UnsupportedOperation {
                op: "remove",
                kind: parent_node.element.kind,
                name: parent_node.element.name.clone(),
            });
        }

        let mut removed = false;
        if let Some(node) = self.arena.get_mut(parent) {
            if let Some(pos) = node.children.iter().position(|&c| c == child) {
                node.children.remove(pos);
                removed = true;
            }
        }
        if removed {
            if let Some(node) = self.arena.get_mut(child) {
                if node.parent == Some(parent) {
                    node.parent = None;
                }
            }
        }
        Ok(())
    }

    /// Draw the element behind `idx` into `out`.
    ///
    /// Atomic elements write their name as one line. Groups write nothing
    /// for themselves and draw each child in current insertion order,
    /// depth-first, left-to-right.
    #[instrument(level = "debug", skip(self, out))]
    pub fn draw<W: Write>(&self, idx: Index, out: &mut W) -> SceneResult<()> {
        let node = self.arena.get(idx).ok_or(SceneError::StaleHandle(idx))?;
        if node.element.kind.is_atomic() {
            writeln!(out, "{}", node.element.name)?;
        } else {
            for &child in &node.children {
                self.draw(child, out)?;
            }
        }
        Ok(())
    }

    #[instrument(level = "trace", skip(self))]
    pub fn iter_from(&self, idx: Index) -> TraversalIter {
        TraversalIter::new(self, idx)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self, idx: Index) -> usize {
        if let Some(node) = self.arena.get(idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Collects names of all atomic descendants, in traversal order.
    ///
    /// A group with no children contributes nothing.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_names(&self, idx: Index) -> Vec<String> {
        let mut leaves = Vec::new();
        self.collect_leaves(idx, &mut leaves);
        leaves
    }

    fn collect_leaves(&self, idx: Index, leaves: &mut Vec<String>) {
        if let Some(node) = self.arena.get(idx) {
            if node.element.kind.is_atomic() {
                leaves.push(node.element.name.clone());
            } else {
                for &child in &node.children {
                    self.collect_leaves(child, leaves);
                }
            }
        }
    }

    /// Structure rendering for terminal display.
    ///
    /// Groups get a trailing slash so an empty group stays distinguishable
    /// from a shape.
    pub fn to_termtree(&self, idx: Index) -> Option<Tree<String>> {
        let node = self.arena.get(idx)?;
        let label = match node.element.kind {
            ElementKind::Group => format!("{}/", node.element.name),
            _ => node.element.name.clone(),
        };
        let leaves: Vec<_> = node
            .children
            .iter()
            .filter_map(|&child| self.to_termtree(child))
            .collect();
        Some(Tree::new(label).with_leaves(leaves))
    }
}

pub struct TraversalIter<'a> {
    arena: &'a SceneArena,
    stack: Vec<Index>,
}

impl<'a> TraversalIter<'a> {
    fn new(arena: &'a SceneArena, start: Index) -> Self {
        let stack = if arena.arena.contains(start) {
            vec![start]
        } else {
            Vec::new()
        };
        Self { arena, stack }
    }
}

impl<'a> Iterator for TraversalIter<'a> {
    type Item = (Index, &'a ElementNode);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}
