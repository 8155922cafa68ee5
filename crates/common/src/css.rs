use crate::types::Coords;

/// Length unit used for every translation and dimension.
pub const UNIT: &str = "px";

/// Angle unit used for every rotation.
pub const ROTATION_UNIT: &str = "deg";

/// Format a number the way a browser stringifies it inside a style value.
///
/// Integral values print without a fractional part and negative zero prints as `0`.
/// Magnitudes of at least `1e21` or below `1e-6` switch to exponent form
/// (`1e+21`, `1.5e-7`).
pub fn css_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_owned();
    }
    if value.is_nan() {
        return "NaN".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
    }
    let magnitude = value.abs();
    if !(1e-6..1e21).contains(&magnitude) {
        let exp = format!("{value:e}");
        return match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
            _ => exp,
        };
    }
    format!("{value}")
}

/// `Math.round` semantics: halves round toward positive infinity.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// A length with the px unit, e.g. `12px`.
pub fn px(value: f64) -> String {
    format!("{}{UNIT}", css_number(value))
}

/// An angle with the deg unit, e.g. `90deg`.
pub fn deg(value: f64) -> String {
    format!("{}{ROTATION_UNIT}", css_number(value))
}

/// Build the wrapper transform for a translation and a rotation in degrees.
///
/// Translations are applied before rotations, in X, Y, Z order for both.
pub fn transform_css(translation: Coords, rotation: Coords) -> String {
    format!(
        "translateX({}) translateY({}) translateZ({}) rotateX({}) rotateY({}) rotateZ({})",
        px(translation.x),
        px(translation.y),
        px(translation.z),
        deg(rotation.x),
        deg(rotation.y),
        deg(rotation.z),
    )
}
