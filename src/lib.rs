//! Composable drawable-element trees.
//!
//! Elements are either atomic shapes (lines, circles) or groups that
//! aggregate children. Every element answers the same operations:
//! `draw`, `add_child`, `remove_child`. Atomic elements fail structural
//! mutation at runtime with an observable error instead of being
//! uncallable, so callers never need to inspect the node kind.
//!
//! Storage is an arena with stable generational handles; a drawable tree
//! is whatever is reachable from a handle. See `SceneArena` for the
//! caller obligations around cycles and shared children.

pub mod arena;
pub mod builder;
pub mod cli;
pub mod config;
pub mod errors;
pub mod exitcode;
pub mod util;

pub use arena::{Element, ElementKind, ElementNode, SceneArena};
pub use builder::{LoadedScene, SceneBuilder};
pub use errors::{SceneError, SceneResult};
