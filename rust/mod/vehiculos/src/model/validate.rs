use catalogo_core::FieldError;

pub(crate) const NOT_NULL: &str = "NotNull";
pub(crate) const SIZE: &str = "Size";

/// Length bounds are counted in UTF-16 code units, so characters outside
/// the BMP count as two.
pub(crate) fn check_size(
    errors: &mut Vec<FieldError>,
    object: &str,
    field: &str,
    value: &str,
    min: usize,
    max: usize,
) {
    let len = value.encode_utf16().count();
    if len < min || len > max {
        errors.push(FieldError::new(object, field, SIZE));
    }
}

/// Take a required text field, recording `NotNull` or `Size` failures.
pub(crate) fn required_text(
    errors: &mut Vec<FieldError>,
    object: &str,
    field: &str,
    value: Option<String>,
    min: usize,
    max: usize,
) -> String {
    match value {
        Some(v) => {
            check_size(errors, object, field, &v, min, max);
            v
        }
        None => {
            errors.push(FieldError::new(object, field, NOT_NULL));
            String::new()
        }
    }
}
