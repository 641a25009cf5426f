use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use regex::Regex;
use tracing::instrument;

use crate::arena::{Element, ElementKind, Index, SceneArena};
use crate::errors::{SceneError, SceneResult};

/// A scene parsed from a declaration file: the arena plus its roots in
/// declaration order.
#[derive(Debug)]
pub struct LoadedScene {
    pub arena: SceneArena,
    pub roots: Vec<Index>,
}

#[derive(Debug, Clone)]
struct Declaration {
    kind: ElementKind,
    name: String,
    parent: Option<String>,
}

/// Builds a `SceneArena` from the line-oriented scene format.
///
/// Each non-comment line declares one element: `<kind> <name> [parent]`
/// with kind one of `line`, `circle`, `group`. Parents may be declared
/// after their children; attachment order under a parent follows file
/// order. Names must be unique within a file.
pub struct SceneBuilder {
    declarations: Vec<Declaration>,
    relationship_cache: HashMap<String, Vec<String>>,
    visited_names: HashSet<String>,
    decl_regex: Regex,
}

impl Default for SceneBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self {
            declarations: Vec::new(),
            relationship_cache: HashMap::new(),
            visited_names: HashSet::new(),
            decl_regex: Regex::new(r"^(\S+)\s+(\S+)(?:\s+(\S+))?$").unwrap(),
        }
    }

    /// Load a scene from a declaration file.
    #[instrument(level = "debug", skip(self))]
    pub fn build_from_file(&mut self, path: &Path) -> SceneResult<LoadedScene> {
        let file = File::open(path).map_err(SceneError::Io)?;
        self.scan(BufReader::new(file))?;
        self.link()
    }

    /// Load a scene from in-memory declaration text.
    #[instrument(level = "debug", skip(self, content))]
    pub fn build_from_str(&mut self, content: &str) -> SceneResult<LoadedScene> {
        self.scan(content.as_bytes())?;
        self.link()
    }

    fn scan<R: BufRead>(&mut self, reader: R) -> SceneResult<()> {
        self.declarations.clear();
        self.relationship_cache.clear();

        let mut seen: HashSet<String> = HashSet::new();
        for (lineno, line) in reader.lines().enumerate() {
            let line = line.map_err(SceneError::Io)?;
            let lineno = lineno + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let caps = self.decl_regex.captures(trimmed).ok_or_else(|| {
                SceneError::InvalidDeclaration {
                    line: lineno,
                    text: trimmed.to_string(),
                }
            })?;
            let kind = match &caps[1] {
                "line" => ElementKind::Line,
                "circle" => ElementKind::Circle,
                "group" => ElementKind::Group,
                other => {
                    return Err(SceneError::UnknownKind {
                        line: lineno,
                        kind: other.to_string(),
                    })
                }
            };
            let name = caps[2].to_string();
            if !seen.insert(name.clone()) {
                return Err(SceneError::DuplicateName {
                    line: lineno,
                    name,
                });
            }
            let parent = caps.get(3).map(|m| m.as_str().to_string());
            if let Some(parent_name) = &parent {
                self.relationship_cache
                    .entry(parent_name.clone())
                    .or_default()
                    .push(name.clone());
            }
            self.declarations.push(Declaration { kind, name, parent });
        }
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    fn link(&mut self) -> SceneResult<LoadedScene> {
        let kinds: HashMap<String, ElementKind> = self
            .declarations
            .iter()
            .map(|d| (d.name.clone(), d.kind))
            .collect();

        for decl in &self.declarations {
            if let Some(parent_name) = &decl.parent {
                if !kinds.contains_key(parent_name) {
                    return Err(SceneError::UnknownParent {
                        name: decl.name.clone(),
                        parent: parent_name.clone(),
                    });
                }
            }
        }

        let mut arena = SceneArena::new();
        let mut roots = Vec::new();
        self.visited_names.clear();

        for root_decl in self.declarations.iter().filter(|d| d.parent.is_none()) {
            let mut stack: Vec<(String, Option<Index>)> = vec![(root_decl.name.clone(), None)];

            while let Some((name, parent_idx)) = stack.pop() {
                // Check for cycles
                if !self.visited_names.insert(name.clone()) {
                    return Err(SceneError::CycleDetected(name));
                }

                let idx = arena.insert(Element::new(name.clone(), kinds[&name]));
                match parent_idx {
                    Some(parent) => arena.add_child(parent, idx)?,
                    None => roots.push(idx),
                }

                if let Some(children) = self.relationship_cache.get(&name) {
                    // Push in reverse so pops attach children in file order
                    for child in children.iter().rev() {
                        stack.push((child.clone(), Some(idx)));
                    }
                }
            }
        }

        // Declarations whose parent chain never reaches a root form a loop
        if self.visited_names.len() < self.declarations.len() {
            let orphan = self
                .declarations
                .iter()
                .map(|d| &d.name)
                .find(|name| !self.visited_names.contains(*name))
                .cloned()
                .unwrap_or_default();
            return Err(SceneError::CycleDetected(orphan));
        }

        Ok(LoadedScene { arena, roots })
    }
}
