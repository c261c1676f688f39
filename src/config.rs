use crate::utils::AppError;
use std::env;

const DEFAULT_LABEL_API_URL: &str = "https://api.fda.gov/drug/label.json";
const DEFAULT_LABEL_TIMEOUT_SECS: u64 = 8;

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_name: Option<String>,
    pub jwt_secret: String,
    pub allowed_origin: String,
    pub label_api_url: String,
    pub label_api_key: Option<String>,
    pub label_timeout_secs: u64,
    pub bcrypt_cost: u32,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |key: &str| {
            optional(key).ok_or_else(|| AppError::Config(format!("{} must be set", key)))
        };

        let database_url = required("DATABASE_URL")?;
        let jwt_secret = required("JWT_SECRET")?;
        let allowed_origin = required("ALLOWED_ORIGIN")?;
        let port = required("PORT")?
            .parse::<u16>()
            .map_err(|e| AppError::Config(format!("PORT is not a valid port: {}", e)))?;

        Ok(Self {
            host: optional("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            database_url,
            database_name: optional("DATABASE_NAME"),
            jwt_secret,
            allowed_origin,
            label_api_url: optional("LABEL_API_URL")
                .unwrap_or_else(|| DEFAULT_LABEL_API_URL.to_string()),
            label_api_key: optional("LABEL_API_KEY"),
            label_timeout_secs: parsed_or(
                "LABEL_TIMEOUT_SECS",
                optional("LABEL_TIMEOUT_SECS"),
                DEFAULT_LABEL_TIMEOUT_SECS,
            )?,
            bcrypt_cost: parsed_or("BCRYPT_COST", optional("BCRYPT_COST"), bcrypt::DEFAULT_COST)?,
        })
    }
}

fn parsed_or<T: std::str::FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T, AppError> {
    match raw {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| AppError::Config(format!("{} has an invalid value: {}", key, raw))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    fn required_vars() -> Vec<(&'static str, &'static str)> {
        vec![
            ("DATABASE_URL", "mongodb://localhost:27017/medscan"),
            ("JWT_SECRET", "secret"),
            ("ALLOWED_ORIGIN", "http://localhost:3000"),
            ("PORT", "5000"),
        ]
    }

    #[test]
    fn defaults_apply_when_only_required_vars_set() {
        let config = AppConfig::from_lookup(lookup_from(&required_vars())).unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert_eq!(config.label_timeout_secs, 8);
        assert_eq!(config.label_api_url, DEFAULT_LABEL_API_URL);
        assert_eq!(config.bcrypt_cost, bcrypt::DEFAULT_COST);
        assert!(config.database_name.is_none());
        assert!(config.label_api_key.is_none());
    }

    #[test]
    fn missing_database_url_stops_startup() {
        let vars: Vec<_> = required_vars()
            .into_iter()
            .filter(|(k, _)| *k != "DATABASE_URL")
            .collect();

        match AppConfig::from_lookup(lookup_from(&vars)) {
            Err(AppError::Config(msg)) => assert_eq!(msg, "DATABASE_URL must be set"),
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn every_required_var_is_enforced() {
        for missing in ["DATABASE_URL", "JWT_SECRET", "ALLOWED_ORIGIN", "PORT"] {
            let mut vars = required_vars();
            for entry in vars.iter_mut().filter(|(k, _)| *k == missing) {
                entry.1 = "   ";
            }
            assert!(
                matches!(AppConfig::from_lookup(lookup_from(&vars)), Err(AppError::Config(_))),
                "{} should be required",
                missing
            );
        }
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let mut vars = required_vars();
        vars[3] = ("PORT", "not-a-port");
        assert!(matches!(AppConfig::from_lookup(lookup_from(&vars)), Err(AppError::Config(_))));

        let mut vars = required_vars();
        vars.push(("LABEL_TIMEOUT_SECS", "soon"));
        assert!(matches!(AppConfig::from_lookup(lookup_from(&vars)), Err(AppError::Config(_))));
    }
}
