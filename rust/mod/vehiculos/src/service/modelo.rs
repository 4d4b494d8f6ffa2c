use catalogo_core::{FieldError, ServiceError};
use catalogo_sql::{Row, Transaction, Value};

use super::{Entity, Repository, Resource};
use crate::model::{Marca, Modelo, ModeloPayload, ModeloView};

fn int_column(row: &Row, name: &str) -> Option<i32> {
    row.get_i64(name).and_then(|v| i32::try_from(v).ok())
}

impl Entity for Modelo {
    const NAME: &'static str = "modelo";
    const TABLE: &'static str = "modelo";
    const COLUMNS: &'static [&'static str] = &[
        "modelo",
        "color",
        "potencia",
        "plazas",
        "precio",
        "numero_serie",
        "marca_id",
    ];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn values(&self) -> Vec<Value> {
        vec![
            Value::from(self.modelo.as_str()),
            Value::from(self.color.clone()),
            Value::from(self.potencia),
            Value::from(self.plazas),
            Value::from(self.precio),
            Value::from(self.numero_serie.clone()),
            Value::from(self.marca_id),
        ]
    }

    fn from_row(row: &Row) -> Result<Self, ServiceError> {
        let modelo = row
            .get_str("modelo")
            .ok_or_else(|| ServiceError::Internal("modelo row without name".into()))?;
        Ok(Modelo {
            id: row.get_i64("id"),
            modelo: modelo.to_string(),
            color: row.get_str("color").map(str::to_string),
            potencia: int_column(row, "potencia"),
            plazas: int_column(row, "plazas"),
            precio: row.get_f64("precio"),
            numero_serie: row.get_str("numero_serie").map(str::to_string),
            marca_id: row.get_i64("marca_id"),
        })
    }
}

impl Resource for Modelo {
    type Payload = ModeloPayload;
    type View = ModeloView;

    const PATH: &'static str = "modelos";

    fn payload_id(payload: &ModeloPayload) -> Option<i64> {
        payload.id
    }

    fn from_payload(payload: ModeloPayload) -> Result<Self, Vec<FieldError>> {
        payload.into_modelo()
    }

    fn merge(payload: ModeloPayload, existing: &mut Self) {
        payload.merge_into(existing);
    }

    fn field_errors(&self) -> Vec<FieldError> {
        self.validate()
    }

    fn view(self, tx: &dyn Transaction) -> Result<ModeloView, ServiceError> {
        let marca = match self.marca_id {
            Some(marca_id) => Repository::<Marca>::new().find_by_id(tx, marca_id)?,
            None => None,
        };
        Ok(ModeloView::new(self, marca))
    }
}
