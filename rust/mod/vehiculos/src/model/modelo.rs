use serde::{Deserialize, Serialize};

use catalogo_core::FieldError;

use super::validate::{NOT_NULL, check_size, required_text};
use super::{Identified, Marca};

/// Car model as stored: the brand is kept as a `Marca` id and resolved on
/// output.
#[derive(Debug, Clone)]
pub struct Modelo {
    pub id: Option<i64>,
    /// Model name, 5 to 50 characters.
    pub modelo: String,
    pub color: Option<String>,
    /// Engine power.
    pub potencia: Option<i32>,
    /// Seat count.
    pub plazas: Option<i32>,
    pub precio: Option<f64>,
    pub numero_serie: Option<String>,
    pub marca_id: Option<i64>,
}

impl Modelo {
    pub const MIN_LEN: usize = 5;
    pub const MAX_LEN: usize = 50;

    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_size(&mut errors, "modelo", "modelo", &self.modelo, Self::MIN_LEN, Self::MAX_LEN);
        errors
    }
}

impl PartialEq for Modelo {
    fn eq(&self, other: &Self) -> bool {
        self.id.is_some() && self.id == other.id
    }
}

/// Brand reference inside a request body. Only `id` is read; the label,
/// if sent back by a client, is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarcaRef {
    #[serde(default)]
    pub id: Option<i64>,
}

/// Request body for create, replace and partial update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModeloPayload {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub modelo: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub potencia: Option<i32>,
    #[serde(default)]
    pub plazas: Option<i32>,
    #[serde(default)]
    pub precio: Option<f64>,
    #[serde(default)]
    pub numero_serie: Option<String>,
    #[serde(default)]
    pub marca: Option<MarcaRef>,
}

impl ModeloPayload {
    pub fn into_modelo(self) -> Result<Modelo, Vec<FieldError>> {
        let mut errors = Vec::new();
        let modelo = required_text(
            &mut errors,
            "modelo",
            "modelo",
            self.modelo,
            Modelo::MIN_LEN,
            Modelo::MAX_LEN,
        );
        let marca_id = match self.marca {
            Some(r) => marca_ref_id(&mut errors, r),
            None => None,
        };
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(Modelo {
            id: self.id,
            modelo,
            color: self.color,
            potencia: self.potencia,
            plazas: self.plazas,
            precio: self.precio,
            numero_serie: self.numero_serie,
            marca_id,
        })
    }

    /// Overwrite the scalar fields of `existing` that are set in this
    /// payload. Null or absent fields keep their stored value, and the brand
    /// reference is never touched: it only changes through a full replace.
    pub fn merge_into(self, existing: &mut Modelo) {
        if let Some(modelo) = self.modelo {
            existing.modelo = modelo;
        }
        if let Some(color) = self.color {
            existing.color = Some(color);
        }
        if let Some(potencia) = self.potencia {
            existing.potencia = Some(potencia);
        }
        if let Some(plazas) = self.plazas {
            existing.plazas = Some(plazas);
        }
        if let Some(precio) = self.precio {
            existing.precio = Some(precio);
        }
        if let Some(numero_serie) = self.numero_serie {
            existing.numero_serie = Some(numero_serie);
        }
    }
}

fn marca_ref_id(errors: &mut Vec<FieldError>, r: MarcaRef) -> Option<i64> {
    if r.id.is_none() {
        errors.push(FieldError::new("modelo", "marca", NOT_NULL));
    }
    r.id
}

/// Response shape of a `Modelo`, with the brand resolved.
#[derive(Debug, Clone, Serialize)]
pub struct ModeloView {
    pub id: Option<i64>,
    pub modelo: String,
    pub color: Option<String>,
    pub potencia: Option<i32>,
    pub plazas: Option<i32>,
    pub precio: Option<f64>,
    pub numero_serie: Option<String>,
    pub marca: Option<Marca>,
}

impl ModeloView {
    pub fn new(modelo: Modelo, marca: Option<Marca>) -> Self {
        Self {
            id: modelo.id,
            modelo: modelo.modelo,
            color: modelo.color,
            potencia: modelo.potencia,
            plazas: modelo.plazas,
            precio: modelo.precio,
            numero_serie: modelo.numero_serie,
            marca,
        }
    }
}

impl Identified for ModeloView {
    fn id(&self) -> Option<i64> {
        self.id
    }
}
