pub mod cache;
pub mod config;
pub mod errors;
pub mod models;
pub mod refresh;
pub mod search;
pub mod sources;
pub mod utils;
pub mod web;
