pub mod config;
pub mod error;
pub mod http_client;
pub mod locations;
pub mod movement;
pub mod persist;
pub mod pipeline;
pub mod resolver;
pub mod statsbomb;
pub mod weather;
