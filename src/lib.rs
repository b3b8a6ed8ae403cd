// Library exports for the download/catalog core and integration tests

pub mod api;
pub mod config;
pub mod db;
pub mod download;
pub mod import;
pub mod library;
