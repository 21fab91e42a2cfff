//! Database entities.

pub mod school;

pub use school::Entity as School;
