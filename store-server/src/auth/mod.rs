//! Authentication and authorization
//!
//! The server does not manage login sessions; it verifies JWTs issued by the
//! auth collaborator and enforces permissions on mutating entry points:
//! - [`JwtService`] - token validation
//! - [`CurrentUser`] - authenticated caller context
//! - [`permissions`] - permission string constants

pub mod extractor;
pub mod jwt;
pub mod permissions;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use permissions::{PERM_ALL, PERM_ORDERS_MANAGE, PERM_PRODUCTS_MANAGE};
