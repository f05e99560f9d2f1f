pub mod notifications;
pub mod products;
pub mod suppliers;

use validator::ValidationError;

// Nome só com espaços conta como vazio.
pub(crate) fn validate_not_blank(val: &str) -> Result<(), ValidationError> {
    if val.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("El nombre es obligatorio.".into());
        return Err(err);
    }
    Ok(())
}
