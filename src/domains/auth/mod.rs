//! Auth domain - token issuing/verification and the session identity value.

pub mod jwt;
pub mod session;

pub use jwt::{Claims, JwtService};
pub use session::Session;
