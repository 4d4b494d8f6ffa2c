use axum::Router;

/// A service module that contributes HTTP routes.
///
/// The binary nests each module's routes under [`Module::mount_path`];
/// modules use the same path to build absolute URLs in responses.
pub trait Module: Send + Sync {
    /// Module name, used for logging and as the route prefix.
    fn name(&self) -> &str;

    /// Path the routes are nested under, `/{name}`.
    fn mount_path(&self) -> String {
        format!("/{}", self.name())
    }

    /// Routes relative to [`Module::mount_path`].
    fn routes(&self) -> Router;
}
