/// Middleware modules for the API server
///
/// The JWT guard lives next to the router in `app`; this module holds the
/// tower layers that wrap every route.

pub mod security;
