use serde::{Deserialize, Serialize};

use catalogo_core::FieldError;

use super::Identified;
use super::validate::{check_size, required_text};

/// Car brand.
///
/// Equality is by identity: two brands are equal only when both have been
/// persisted and carry the same id.
#[derive(Debug, Clone, Serialize)]
pub struct Marca {
    pub id: Option<i64>,

    /// Brand label, 1 to 20 characters.
    pub marca: String,
}

impl Marca {
    pub const MIN_LEN: usize = 1;
    pub const MAX_LEN: usize = 20;

    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_size(&mut errors, "marca", "marca", &self.marca, Self::MIN_LEN, Self::MAX_LEN);
        errors
    }
}

impl PartialEq for Marca {
    fn eq(&self, other: &Self) -> bool {
        self.id.is_some() && self.id == other.id
    }
}

impl Identified for Marca {
    fn id(&self) -> Option<i64> {
        self.id
    }
}

/// Request body for create, replace and partial update. Every field is
/// optional so that missing required fields become field errors.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarcaPayload {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub marca: Option<String>,
}

impl MarcaPayload {
    pub fn into_marca(self) -> Result<Marca, Vec<FieldError>> {
        let mut errors = Vec::new();
        let marca = required_text(
            &mut errors,
            "marca",
            "marca",
            self.marca,
            Marca::MIN_LEN,
            Marca::MAX_LEN,
        );
        if errors.is_empty() {
            Ok(Marca { id: self.id, marca })
        } else {
            Err(errors)
        }
    }

    /// Overwrite the fields of `existing` that are set in this payload.
    pub fn merge_into(self, existing: &mut Marca) {
        if let Some(marca) = self.marca {
            existing.marca = marca;
        }
    }
}
