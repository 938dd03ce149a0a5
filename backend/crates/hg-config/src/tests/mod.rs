mod config;
mod rate_limit;
mod server;
