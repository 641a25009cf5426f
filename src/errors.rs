use generational_arena::Index;
use thiserror::Error;

use crate::arena::ElementKind;

#[derive(Error, Debug)]
pub enum SceneError {
    #[error("cannot {op} on {kind} '{name}': atomic elements hold no children")]
    UnsupportedOperation {
        op: &'static str,
        kind: ElementKind,
        name: String,
    },

    #[error("stale element handle: {0:?}")]
    StaleHandle(Index),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: unknown element kind '{kind}'")]
    UnknownKind { line: usize, kind: String },

    #[error("line {line}: invalid declaration: '{text}'")]
    InvalidDeclaration { line: usize, text: String },

    #[error("line {line}: duplicate element name '{name}'")]
    DuplicateName { line: usize, name: String },

    #[error("element '{name}' references unknown parent '{parent}'")]
    UnknownParent { name: String, parent: String },

    #[error("cycle detected in scene hierarchy involving: {0}")]
    CycleDetected(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type SceneResult<T> = Result<T, SceneError>;
