#[macro_use]
mod macros;

pub mod api;
pub mod catalog;
pub mod config;
pub mod database;
pub mod error;
pub mod format;
pub mod logger;
pub mod model;
pub mod newsletter;
pub mod settings;
pub mod ticker;
pub mod users;
