pub mod ghost;
pub mod health;
pub mod validate;
