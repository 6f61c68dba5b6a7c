pub mod location;
pub mod member;
pub mod team;
