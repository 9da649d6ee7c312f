pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod pagination;
pub mod render;
pub mod search;
pub mod timecode;
pub mod utils;
