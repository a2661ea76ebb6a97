pub mod controller;
pub mod error;
pub mod persistence;
pub mod query;
pub mod slug;
pub mod traits;
pub mod validation;

pub use error::{AppError, Result};
pub use query::{ResourcePage, ResourceQuery};
pub use traits::{Resource, ResourceRepository};
pub use validation::{Enumerated, Params, Payload, ValidationErrors};
