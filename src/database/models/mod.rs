pub mod location;
pub mod member;
pub mod team;

// Re-export all models for easy importing
pub use location::*;
pub use member::*;
pub use team::*;
