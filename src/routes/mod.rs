/// Router Module Index
///
/// Organizes the application's routing logic into access-segregated modules,
/// so access control is applied explicitly at the module level (via Axum
/// layers) rather than per handler.

/// Routes accessible to all clients: blog and user listings, blog detail,
/// the open update endpoint, and the health probe.
pub mod public;

/// Routes protected by the `AuthUser` extractor middleware.
/// Requires a verified bearer token resolving to a stored user.
pub mod authenticated;

/// The test-state reset route. Mounted only in the local environment.
pub mod testing;
