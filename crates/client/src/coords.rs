//! Coordinate parsing.

use classgeo_core::Error;

/// Parse a text-encoded decimal coordinate.
///
/// # Errors
///
/// Returns `Error::ValueFormat` naming `field` when the text is not a finite
/// decimal number. Surrounding whitespace is not tolerated.
pub fn parse_coordinate(field: &str, text: &str) -> Result<f64, Error> {
    let value: f64 = text
        .parse()
        .map_err(|e| Error::ValueFormat(format!("{field} {text:?} is not a decimal number: {e}")))?;

    if !value.is_finite() {
        return Err(Error::ValueFormat(format!("{field} {text:?} is not finite")));
    }

    Ok(value)
}
