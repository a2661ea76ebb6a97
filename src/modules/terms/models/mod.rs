pub mod dto;
pub mod term;

pub use dto::{NewTerm, TermChanges, TermFilter, Terms};
pub use term::Term;
