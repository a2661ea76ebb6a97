pub mod auth;
pub mod rate_limit;
pub mod request_id;

pub use auth::{hash_token, verify_token, AdminAuth};
pub use rate_limit::RateLimiter;
pub use request_id::{RequestId, REQUEST_ID_HEADER};
