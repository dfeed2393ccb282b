// Token validation and request identity

pub mod jwt;
pub mod middleware;

pub use jwt::{extract_bearer_token, issue_token, Claims, JwtValidator};
pub use middleware::{jwt_auth_middleware, AuthUser};
