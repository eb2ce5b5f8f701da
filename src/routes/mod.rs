/// Router Module Index
///
/// Organizes the application's routing logic into security-segregated modules,
/// so access control is applied explicitly at the module level (via Axum
/// layers) instead of being re-derived handler by handler.
///
/// The three modules map directly to the defined access tiers.

/// Routes accessible to all clients (anonymous reads, register/login).
pub mod public;

/// Routes protected by the `AuthUser` extractor middleware.
/// Requires a validated session token.
pub mod authenticated;

/// Routes restricted exclusively to principals with the 'admin' role.
pub mod admin;
