use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,

    pub password: String,
    /// Must match `password`
    pub password_confirm: String,

    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}
