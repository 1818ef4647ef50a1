//! Login, password change and dashboard.

use serde::{Deserialize, Serialize};

use medayu_core::DashboardCounts;

/// `POST /login`, urlencoded.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// Only the email is re-populated; passwords never enter the session.
    pub fn values(&self) -> serde_json::Value {
        serde_json::json!({ "email": self.email })
    }
}

#[derive(Debug, Serialize)]
pub struct LoginData {}

/// `POST /manager/password`, urlencoded.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PasswordForm {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Debug, Serialize)]
pub struct PasswordPageData {
    pub min_length: usize,
}

#[derive(Debug, Serialize)]
pub struct DashboardData {
    pub counts: DashboardCounts,
}
