pub mod api;
pub mod cache;
pub mod config;
pub mod db;
pub mod fetch_error;
pub mod gempa;
pub mod services;
pub mod weather;
