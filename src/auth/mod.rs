pub mod caller;
pub mod claims;
pub mod identity;
pub mod jwt;
pub mod middleware;

pub use caller::Caller;
pub use claims::{require_owner, Claims};
pub use identity::{GoTrueIdentityProvider, IdentityProvider};
pub use jwt::JwtService;
pub use middleware::{AuthenticatedTeacher, MaybeAuthenticated};
