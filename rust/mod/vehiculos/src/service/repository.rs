//! Generic row gateway keyed by numeric identity.
//!
//! Entities declare their table and column layout through [`Entity`];
//! [`Repository`] builds the SQL. Every call runs on a caller-supplied
//! transaction so one API request commits or rolls back as a whole.

use std::marker::PhantomData;

use catalogo_core::{Page, PageRequest, ServiceError, error_key};
use catalogo_sql::{Row, SQLError, Transaction, Value};

/// A persisted record with a server-assigned `id INTEGER PRIMARY KEY`.
pub trait Entity: Sized {
    /// Entity name used in messages and alert headers.
    const NAME: &'static str;

    const TABLE: &'static str;

    /// Columns besides `id`, in the order [`Entity::values`] returns them.
    const COLUMNS: &'static [&'static str];

    fn id(&self) -> Option<i64>;

    fn set_id(&mut self, id: i64);

    fn values(&self) -> Vec<Value>;

    fn from_row(row: &Row) -> Result<Self, ServiceError>;
}

pub struct Repository<E: Entity> {
    _phantom: PhantomData<E>,
}

impl<E: Entity> Default for Repository<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> Repository<E> {
    pub fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }

    fn sql_err(e: SQLError) -> ServiceError {
        ServiceError::Storage(e.to_string())
    }

    fn select_columns() -> String {
        std::iter::once("id")
            .chain(E::COLUMNS.iter().copied())
            .map(|c| format!("\"{}\"", c))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Insert when `id` is absent, update otherwise. Returns the entity
    /// with its id populated.
    pub fn save(&self, tx: &dyn Transaction, mut entity: E) -> Result<E, ServiceError> {
        let mut params = entity.values();

        match entity.id() {
            None => {
                let cols: Vec<String> = E::COLUMNS.iter().map(|c| format!("\"{}\"", c)).collect();
                let placeholders: Vec<String> =
                    (1..=E::COLUMNS.len()).map(|i| format!("?{}", i)).collect();
                let sql = format!(
                    "INSERT INTO \"{}\" ({}) VALUES ({})",
                    E::TABLE,
                    cols.join(", "),
                    placeholders.join(", "),
                );
                let id = tx.insert(&sql, &params).map_err(Self::sql_err)?;
                entity.set_id(id);
            }
            Some(id) => {
                let sets: Vec<String> = E::COLUMNS
                    .iter()
                    .enumerate()
                    .map(|(i, c)| format!("\"{}\" = ?{}", c, i + 1))
                    .collect();
                let sql = format!(
                    "UPDATE \"{}\" SET {} WHERE id = ?{}",
                    E::TABLE,
                    sets.join(", "),
                    E::COLUMNS.len() + 1,
                );
                params.push(Value::Integer(id));
                let affected = tx.exec(&sql, &params).map_err(Self::sql_err)?;
                if affected == 0 {
                    return Err(ServiceError::NotFound(format!("{} {}", E::NAME, id)));
                }
            }
        }

        Ok(entity)
    }

    pub fn find_by_id(&self, tx: &dyn Transaction, id: i64) -> Result<Option<E>, ServiceError> {
        let sql = format!(
            "SELECT {} FROM \"{}\" WHERE id = ?1",
            Self::select_columns(),
            E::TABLE
        );
        let rows = tx.query(&sql, &[Value::Integer(id)]).map_err(Self::sql_err)?;
        rows.first().map(E::from_row).transpose()
    }

    pub fn exists_by_id(&self, tx: &dyn Transaction, id: i64) -> Result<bool, ServiceError> {
        let sql = format!("SELECT 1 AS found FROM \"{}\" WHERE id = ?1", E::TABLE);
        let rows = tx.query(&sql, &[Value::Integer(id)]).map_err(Self::sql_err)?;
        Ok(!rows.is_empty())
    }

    pub fn count(&self, tx: &dyn Transaction) -> Result<u64, ServiceError> {
        let sql = format!("SELECT COUNT(*) AS cnt FROM \"{}\"", E::TABLE);
        let rows = tx.query(&sql, &[]).map_err(Self::sql_err)?;
        Ok(rows.first().and_then(|r| r.get_i64("cnt")).unwrap_or(0) as u64)
    }

    /// One page of rows in the requested order, `id` ascending as the
    /// final tiebreaker. Sort properties must be `id` or one of
    /// [`Entity::COLUMNS`].
    pub fn find_all(
        &self,
        tx: &dyn Transaction,
        request: &PageRequest,
    ) -> Result<Page<E>, ServiceError> {
        let order_by = Self::order_by(request)?;
        let total = self.count(tx)?;

        let limit = i64::try_from(request.size).unwrap_or(i64::MAX);
        let offset = i64::try_from(request.offset()).unwrap_or(i64::MAX);
        let sql = format!(
            "SELECT {} FROM \"{}\" ORDER BY {} LIMIT ?1 OFFSET ?2",
            Self::select_columns(),
            E::TABLE,
            order_by,
        );
        let rows = tx
            .query(&sql, &[Value::Integer(limit), Value::Integer(offset)])
            .map_err(Self::sql_err)?;
        let items = rows.iter().map(E::from_row).collect::<Result<Vec<_>, _>>()?;

        Ok(Page {
            items,
            total,
            page: request.page,
            size: request.size,
        })
    }

    fn order_by(request: &PageRequest) -> Result<String, ServiceError> {
        let mut clauses = Vec::with_capacity(request.sort.len() + 1);
        let mut has_id = false;
        for order in &request.sort {
            let property = order.property.as_str();
            if property == "id" {
                has_id = true;
            } else if !E::COLUMNS.contains(&property) {
                return Err(ServiceError::bad_request(
                    E::NAME,
                    error_key::BAD_SORT,
                    format!("unknown sort property '{}'", property),
                ));
            }
            clauses.push(format!("\"{}\" {}", property, order.direction.as_sql()));
        }
        if !has_id {
            clauses.push("\"id\" ASC".to_string());
        }
        Ok(clauses.join(", "))
    }

    /// Remove the row if present. Deleting an absent id is a no-op.
    pub fn delete_by_id(&self, tx: &dyn Transaction, id: i64) -> Result<(), ServiceError> {
        let sql = format!("DELETE FROM \"{}\" WHERE id = ?1", E::TABLE);
        tx.exec(&sql, &[Value::Integer(id)]).map_err(Self::sql_err)?;
        Ok(())
    }
}
