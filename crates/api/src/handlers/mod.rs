pub mod auth;
pub mod category;
pub mod dashboard;
pub mod movement;
pub mod product;
pub mod user;
pub mod warehouse;
