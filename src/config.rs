use std::str::FromStr;

use serde::Deserialize;

/// Which resource kind this deployment serves. A single deployment never
/// exposes both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Courses,
    Products,
}

impl FromStr for Variant {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "courses" => Ok(Variant::Courses),
            "products" => Ok(Variant::Products),
            other => {
                anyhow::bail!("unknown APP_VARIANT '{other}' (expected 'courses' or 'products')")
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub variant: Variant,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = std::env::var("APP_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(8080);
        let variant = match std::env::var("APP_VARIANT") {
            Ok(v) => v.parse()?,
            Err(_) => Variant::Courses,
        };
        let jwt = JwtConfig {
            // The signing secret always comes from the environment.
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "varigraph".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "varigraph-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
        };
        Ok(Self {
            database_url,
            host,
            port,
            variant,
            jwt,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_parses_known_values() {
        assert_eq!("courses".parse::<Variant>().unwrap(), Variant::Courses);
        assert_eq!("Products".parse::<Variant>().unwrap(), Variant::Products);
        assert_eq!(" courses ".parse::<Variant>().unwrap(), Variant::Courses);
    }

    #[test]
    fn variant_rejects_unknown_values() {
        let err = "inventory".parse::<Variant>().unwrap_err();
        assert!(err.to_string().contains("inventory"));
    }
}
