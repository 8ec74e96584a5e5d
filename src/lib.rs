pub mod aggregator;
pub mod catalog;
pub mod config;
pub mod date;
pub mod decoder;
pub mod dpi;
pub mod error;
pub mod geocode;
pub mod gps;
pub mod inspector;
pub mod metadata;
pub mod processor;
pub mod walker;
pub mod web_server;
