use glam::DMat4;

use crate::css::css_number;
use crate::types::Coords;

/// Errors from parsing a CSS `matrix3d(...)` value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransformParseError {
    #[error("not a matrix3d() value: {0}")]
    NotMatrix3d(String),
    #[error("matrix3d() needs 16 components, got {0}")]
    WrongArity(usize),
    #[error("invalid matrix component {0:?}")]
    InvalidNumber(String),
}

/// Translation and rotation (degrees) recovered from a computed transform.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Decomposed {
    pub translation: Coords,
    pub rotation: Coords,
}

/// Serialize a column-major matrix the way `getComputedStyle` reports it.
pub fn format_matrix3d(m: &DMat4) -> String {
    let parts: Vec<String> = m.to_cols_array().iter().map(|v| css_number(*v)).collect();
    format!("matrix3d({})", parts.join(", "))
}

/// Recover translations and X/Y/Z rotations from a `matrix3d(...)` string.
///
/// Assumes the matrix was built as `translate * rotateX * rotateY * rotateZ`.
/// Near gimbal lock (|sin ry| ~ 1) the X and Z angles cannot be separated
/// and are reported as zero.
pub fn decompose_matrix3d(value: &str) -> Result<Decomposed, TransformParseError> {
    let trimmed = value.trim();
    let inner = trimmed
        .strip_prefix("matrix3d(")
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| TransformParseError::NotMatrix3d(trimmed.to_owned()))?;

    let m = inner
        .split(',')
        .map(|part| {
            let part = part.trim();
            part.parse::<f64>()
                .map_err(|_| TransformParseError::InvalidNumber(part.to_owned()))
        })
        .collect::<Result<Vec<f64>, _>>()?;

    if m.len() != 16 {
        return Err(TransformParseError::WrongArity(m.len()));
    }

    let rotate_y = m[8].clamp(-1.0, 1.0).asin().to_degrees();
    let (rotate_x, rotate_z) = if m[8].abs() < 0.99999 {
        (
            (-m[9]).atan2(m[10]).to_degrees(),
            (-m[4]).atan2(m[0]).to_degrees(),
        )
    } else {
        (0.0, 0.0)
    };

    Ok(Decomposed {
        translation: Coords::new(m[12], m[13], m[14]),
        rotation: Coords::new(rotate_x, rotate_y, rotate_z),
    })
}
