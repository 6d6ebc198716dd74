use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    /// A structural split changed the sequence of leaves under `parent`
    #[error("splitting below node {parent} changed its leaf content")]
    ContentMismatch { parent: usize },

    #[error("node {node} is not inside root {root}")]
    NotInRoot { root: usize, node: usize },

    #[error("node {0} is not attached to a parent")]
    Detached(usize),

    #[error("cannot wrap an empty run of nodes")]
    EmptyRun,
}
