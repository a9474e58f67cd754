use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
}

impl User {
    /// Stand-in identity used while no sign-in provider is configured
    pub fn guest() -> Self {
        Self {
            id: "guest".to_string(),
            email: "guest@local".to_string(),
            name: Some("Guest".to_string()),
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}
