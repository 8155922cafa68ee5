use crate::body::BodyHandle;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PhysicsError {
    #[error("no body with handle {0:?}")]
    UnknownBody(BodyHandle),
    #[error("time step must be finite and non-negative, got {0}")]
    InvalidTimeStep(f64),
}
