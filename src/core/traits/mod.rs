pub mod repository;
pub mod resource;

pub use repository::ResourceRepository;
pub use resource::Resource;
