#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Room not found: {0}")]
    RoomNotFound(String),

    #[error("Department not found: {0}")]
    DepartmentNotFound(String),

    #[error("Invalid hierarchy: {0}")]
    InvalidHierarchy(String),
}
