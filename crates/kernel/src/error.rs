use displayblock_common::ItemId;

/// Errors from scene graph operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SceneError {
    #[error("item {0} not found")]
    ItemNotFound(ItemId),
    #[error("scene {0:?} not found")]
    SceneNotFound(String),
    #[error("item {0} is not a line")]
    NotALine(ItemId),
    #[error("item {0} has no center to attach a line to")]
    NoCenter(ItemId),
}
