// Terms module: coffee glossary entries shown on the public site

pub mod controller;
pub mod models;
pub mod repositories;

pub use models::{NewTerm, Term, TermChanges, TermFilter, Terms};
pub use repositories::MySqlTermRepository;
