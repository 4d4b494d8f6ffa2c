pub mod config;
pub mod error;
pub mod headers;
pub mod module;
pub mod types;

pub use config::ServiceConfig;
pub use error::{FieldError, ServiceError, error_key};
pub use module::Module;
pub use types::{Direction, Page, PageDefaults, PageRequest, SortOrder};
