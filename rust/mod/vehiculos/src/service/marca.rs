use catalogo_core::{FieldError, ServiceError};
use catalogo_sql::{Row, Transaction, Value};

use super::{Entity, Resource};
use crate::model::{Marca, MarcaPayload};

impl Entity for Marca {
    const NAME: &'static str = "marca";
    const TABLE: &'static str = "marca";
    const COLUMNS: &'static [&'static str] = &["marca"];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn values(&self) -> Vec<Value> {
        vec![Value::from(self.marca.as_str())]
    }

    fn from_row(row: &Row) -> Result<Self, ServiceError> {
        let marca = row
            .get_str("marca")
            .ok_or_else(|| ServiceError::Internal("marca row without label".into()))?;
        Ok(Marca {
            id: row.get_i64("id"),
            marca: marca.to_string(),
        })
    }
}

impl Resource for Marca {
    type Payload = MarcaPayload;
    type View = Marca;

    const PATH: &'static str = "marcas";

    fn payload_id(payload: &MarcaPayload) -> Option<i64> {
        payload.id
    }

    fn from_payload(payload: MarcaPayload) -> Result<Self, Vec<FieldError>> {
        payload.into_marca()
    }

    fn merge(payload: MarcaPayload, existing: &mut Self) {
        payload.merge_into(existing);
    }

    fn field_errors(&self) -> Vec<FieldError> {
        self.validate()
    }

    fn view(self, _tx: &dyn Transaction) -> Result<Marca, ServiceError> {
        Ok(self)
    }
}
