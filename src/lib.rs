pub mod alerts;
pub mod api_football;
pub mod config;
pub mod handler;
pub mod model;
pub mod sns;
