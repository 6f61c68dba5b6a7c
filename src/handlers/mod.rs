pub mod health;
pub mod shared;
