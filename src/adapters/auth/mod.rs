//! Authentication adapters.
//!
//! - `argon2_hasher` - Argon2id implementation of the `PasswordHasher` port
//! - `jwt` - HS256 session tokens implementing `TokenIssuer` and `SessionValidator`

mod argon2_hasher;
mod jwt;

pub use argon2_hasher::Argon2PasswordHasher;
pub use jwt::{JwtSessionService, SessionClaims};
