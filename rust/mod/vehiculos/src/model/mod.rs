mod marca;
mod modelo;
mod validate;

pub use marca::*;
pub use modelo::*;

/// Anything carrying the server-assigned numeric identity.
pub trait Identified {
    fn id(&self) -> Option<i64>;
}
