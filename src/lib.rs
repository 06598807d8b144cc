pub mod app;
pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod i18n;
pub mod middleware;
pub mod proxy;
pub mod services;
