pub mod audit;
pub mod maintenance;
pub mod sessions;
pub mod tokens;
