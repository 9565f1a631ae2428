pub mod geometry;
pub mod models;
pub mod tables;
pub mod templates;
