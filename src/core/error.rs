use super::helper::Id;

/// Errors loading a serialized document
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("malformed document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: Id },
}

/// Errors rejecting a command batch before any mutation
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: Id },
}
