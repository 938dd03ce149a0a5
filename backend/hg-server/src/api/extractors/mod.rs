pub mod client_meta;
pub mod current_user;
