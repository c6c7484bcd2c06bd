#[derive(Debug, Clone)]
pub struct RatingSettings {
    pub starter_rating: i64,
}

impl Default for RatingSettings {
    fn default() -> Self {
        Self {
            starter_rating: 1500,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub secret: String,
    pub token_ttl_secs: i64,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            secret: std::env::var("JWT_SECRET").unwrap_or_else(|_| "change-me".to_string()),
            token_ttl_secs: 3600, // 1 hour
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub rating: RatingSettings,
    pub auth: AuthSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            rating: RatingSettings::default(),
            auth: AuthSettings::default(),
        }
    }
}
