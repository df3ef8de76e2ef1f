//! Authentication handlers.
//!
//! ## Commands
//! - Login, registration and password change
//! - Admin account bootstrap at start-up
//!
//! ## Queries
//! - Session verification against the stored account

mod bootstrap_admin;
mod change_password;
mod login;
mod register;
mod verify_session;

pub use bootstrap_admin::{BootstrapAdminCommand, BootstrapAdminHandler, BootstrapAdminResult};
pub use change_password::{ChangePasswordCommand, ChangePasswordHandler};
pub use login::{LoginCommand, LoginHandler, LoginResult};
pub use register::{RegisterCommand, RegisterHandler, RegisterResult};
pub use verify_session::{VerifySessionHandler, VerifySessionQuery};
