pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod oauth;
pub mod routes;
pub mod security;
pub mod shutdown;
