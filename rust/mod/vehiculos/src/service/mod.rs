pub mod marca;
pub mod modelo;
pub mod repository;
pub mod schema;

use std::fmt::Debug;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use catalogo_core::{FieldError, Page, PageRequest, ServiceError, error_key};
use catalogo_sql::{SQLError, SQLStore, Transaction};

use crate::model::Identified;
pub use repository::{Entity, Repository};

/// An entity exposed as a REST collection.
///
/// Ties the stored record to its request body (`Payload`) and its response
/// shape (`View`), and tells the service how to build, merge and check it.
pub trait Resource: Entity + Send + Sync + 'static {
    type Payload: DeserializeOwned + Debug + Send;
    type View: Serialize + Identified + Send;

    /// Collection segment under the API prefix, e.g. `modelos`.
    const PATH: &'static str;

    fn payload_id(payload: &Self::Payload) -> Option<i64>;

    /// Build a new record from a full body. Missing or malformed required
    /// fields come back as field errors.
    fn from_payload(payload: Self::Payload) -> Result<Self, Vec<FieldError>>;

    /// Overwrite the fields of `existing` that are non-null in `payload`.
    fn merge(payload: Self::Payload, existing: &mut Self);

    fn field_errors(&self) -> Vec<FieldError>;

    /// Response shape, resolving references through `tx`.
    fn view(self, tx: &dyn Transaction) -> Result<Self::View, ServiceError>;
}

/// Catalogo service: owns the SQL store and runs every operation in its
/// own transaction.
pub struct CatalogoService {
    sql: Arc<dyn SQLStore>,
}

fn storage(e: SQLError) -> ServiceError {
    ServiceError::Storage(e.to_string())
}

fn invalid<R: Resource>(errors: Vec<FieldError>) -> ServiceError {
    ServiceError::Validation {
        entity: R::NAME.to_string(),
        errors,
    }
}

impl CatalogoService {
    pub fn new(sql: Arc<dyn SQLStore>) -> Result<Self, ServiceError> {
        schema::init_schema(sql.as_ref())?;
        Ok(Self { sql })
    }

    fn begin(&self) -> Result<Box<dyn Transaction + '_>, ServiceError> {
        self.sql.begin().map_err(storage)
    }

    /// Insert a new record. The body must not carry an id.
    pub fn create<R: Resource>(&self, payload: R::Payload) -> Result<R::View, ServiceError> {
        if R::payload_id(&payload).is_some() {
            return Err(ServiceError::bad_request(
                R::NAME,
                error_key::ID_EXISTS,
                format!("A new {} cannot already have an ID", R::NAME),
            ));
        }
        let entity = R::from_payload(payload).map_err(invalid::<R>)?;

        let tx = self.begin()?;
        let saved = Repository::<R>::new().save(tx.as_ref(), entity)?;
        let view = saved.view(tx.as_ref())?;
        tx.commit().map_err(storage)?;

        info!(entity = R::NAME, id = ?view.id(), "created");
        Ok(view)
    }

    /// Replace every field of an existing record.
    ///
    /// The body is validated before the id checks, so an invalid body
    /// reports `validation` even when its id is also wrong.
    pub fn update<R: Resource>(
        &self,
        id: i64,
        payload: R::Payload,
    ) -> Result<R::View, ServiceError> {
        let body_id = R::payload_id(&payload);
        let mut entity = R::from_payload(payload).map_err(invalid::<R>)?;
        check_ids::<R>(id, body_id)?;

        let repo = Repository::<R>::new();
        let tx = self.begin()?;
        ensure_exists(&repo, tx.as_ref(), id)?;

        entity.set_id(id);
        let saved = repo.save(tx.as_ref(), entity)?;
        let view = saved.view(tx.as_ref())?;
        tx.commit().map_err(storage)?;

        info!(entity = R::NAME, id, "updated");
        Ok(view)
    }

    /// Merge the non-null fields of `payload` into an existing record.
    ///
    /// `Ok(None)` means the row passed the existence check but was gone
    /// when fetched.
    pub fn partial_update<R: Resource>(
        &self,
        id: i64,
        payload: R::Payload,
    ) -> Result<Option<R::View>, ServiceError> {
        check_ids::<R>(id, R::payload_id(&payload))?;

        let repo = Repository::<R>::new();
        let tx = self.begin()?;
        ensure_exists(&repo, tx.as_ref(), id)?;

        let Some(mut existing) = repo.find_by_id(tx.as_ref(), id)? else {
            debug!(entity = R::NAME, id, "row vanished before merge");
            return Ok(None);
        };
        R::merge(payload, &mut existing);
        let errors = existing.field_errors();
        if !errors.is_empty() {
            return Err(invalid::<R>(errors));
        }

        let saved = repo.save(tx.as_ref(), existing)?;
        let view = saved.view(tx.as_ref())?;
        tx.commit().map_err(storage)?;

        info!(entity = R::NAME, id, "partially updated");
        Ok(Some(view))
    }

    pub fn find<R: Resource>(&self, id: i64) -> Result<Option<R::View>, ServiceError> {
        let tx = self.begin()?;
        let view = match Repository::<R>::new().find_by_id(tx.as_ref(), id)? {
            Some(entity) => Some(entity.view(tx.as_ref())?),
            None => None,
        };
        tx.commit().map_err(storage)?;
        Ok(view)
    }

    pub fn list<R: Resource>(&self, request: &PageRequest) -> Result<Page<R::View>, ServiceError> {
        let tx = self.begin()?;
        let page = Repository::<R>::new().find_all(tx.as_ref(), request)?;
        let items = page
            .items
            .into_iter()
            .map(|e| e.view(tx.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        tx.commit().map_err(storage)?;

        Ok(Page {
            items,
            total: page.total,
            page: page.page,
            size: page.size,
        })
    }

    /// Delete a record. Absent ids succeed without effect.
    pub fn delete<R: Resource>(&self, id: i64) -> Result<(), ServiceError> {
        let tx = self.begin()?;
        Repository::<R>::new().delete_by_id(tx.as_ref(), id)?;
        tx.commit().map_err(storage)?;

        info!(entity = R::NAME, id, "deleted");
        Ok(())
    }

    pub fn count<R: Resource>(&self) -> Result<u64, ServiceError> {
        let tx = self.begin()?;
        let total = Repository::<R>::new().count(tx.as_ref())?;
        tx.commit().map_err(storage)?;
        Ok(total)
    }
}

/// Body id must be present and match the path id.
fn check_ids<R: Resource>(path_id: i64, body_id: Option<i64>) -> Result<(), ServiceError> {
    match body_id {
        None => Err(ServiceError::bad_request(R::NAME, error_key::ID_NULL, "Invalid id")),
        Some(body_id) if body_id != path_id => {
            Err(ServiceError::bad_request(R::NAME, error_key::ID_INVALID, "Invalid ID"))
        }
        Some(_) => Ok(()),
    }
}

fn ensure_exists<R: Resource>(
    repo: &Repository<R>,
    tx: &dyn Transaction,
    id: i64,
) -> Result<(), ServiceError> {
    if repo.exists_by_id(tx, id)? {
        Ok(())
    } else {
        Err(ServiceError::bad_request(R::NAME, error_key::ID_NOT_FOUND, "Entity not found"))
    }
}
