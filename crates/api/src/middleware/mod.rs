//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the authenticated, still-active user behind a Bearer token.
//! - [`policy`] -- `AuthUser::authorize`, the single access check every handler calls.

pub mod auth;
pub mod policy;
