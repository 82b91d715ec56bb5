// ============================
// crates/backend-lib/src/auth/mod.rs
// ============================
//! Authentication module.

pub mod middleware;
pub mod password;
pub mod session;
pub mod token;

pub use middleware::{authenticate, AuthUser, SESSION_COOKIE};
pub use password::{hash_password, verify_password};
pub use session::{Session, SessionManager};
pub use token::{Claims, TokenCodec, TokenError};
