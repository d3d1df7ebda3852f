//! Configuration options for talking to the gateway

use std::{env, fmt, path::PathBuf, str::FromStr};

use crate::{
    catalog::Catalog,
    constants::{SIGNATURE_VERSION, endpoints},
    validation::ValidationError,
};

/// Environment variable selecting the gateway environment
pub const ENV_ENVIRONMENT: &str = "REDSYS_ENVIRONMENT";
/// Environment variable overriding the signature version
pub const ENV_SIGNATURE_VERSION: &str = "REDSYS_SIGNATURE_VERSION";
/// Environment variable pointing at a catalog file
pub const ENV_CATALOG: &str = "REDSYS_CATALOG";

/// Gateway environment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    /// Integration environment (default)
    #[default]
    Test,
    /// Production environment
    Live,
}

impl Environment {
    /// Endpoint the redirect form posts to
    pub const fn redirect_url(&self) -> &'static str {
        match self {
            Self::Test => endpoints::TEST_REDIRECT,
            Self::Live => endpoints::LIVE_REDIRECT,
        }
    }

    /// WSDL of the SOAP entry point used for direct payments
    pub const fn soap_url(&self) -> &'static str {
        match self {
            Self::Test => endpoints::TEST_SOAP,
            Self::Live => endpoints::LIVE_SOAP,
        }
    }
}

impl FromStr for Environment {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "test" => Ok(Self::Test),
            "live" => Ok(Self::Live),
            other => Err(ValidationError::UnknownEnvironment(other.to_owned())),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Test => "test",
            Self::Live => "live",
        })
    }
}

/// Configuration options for signing and verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Gateway environment
    pub environment: Environment,

    /// Value sent as `Ds_SignatureVersion`
    pub signature_version: String,

    /// Catalog file replacing the embedded one
    pub catalog_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            signature_version: SIGNATURE_VERSION.to_owned(),
            catalog_path: None,
        }
    }
}

impl Config {
    /// Build a configuration from `REDSYS_*` environment variables, falling
    /// back to defaults for anything unset
    pub fn from_env() -> Result<Self, ValidationError> {
        let mut config = Self::default();

        if let Ok(environment) = env::var(ENV_ENVIRONMENT) {
            config.environment = environment.parse()?;
        }
        if let Ok(version) = env::var(ENV_SIGNATURE_VERSION) {
            if !version.trim().is_empty() {
                config.signature_version = version.trim().to_owned();
            }
        }
        config.catalog_path = env::var_os(ENV_CATALOG).map(PathBuf::from);

        Ok(config)
    }

    /// Set the environment
    pub const fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Set the catalog file
    pub fn with_catalog_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog_path = Some(path.into());
        self
    }

    /// Build the catalog this configuration points at
    pub fn catalog(&self) -> Catalog {
        self.catalog_path
            .as_ref()
            .map_or_else(Catalog::embedded, |path| Catalog::from_path(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.environment, Environment::Test);
        assert_eq!(config.signature_version, "HMAC_SHA256_V1");
        assert!(config.catalog_path.is_none());
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!("live".parse::<Environment>(), Ok(Environment::Live));
        assert_eq!(" test ".parse::<Environment>(), Ok(Environment::Test));
        assert_eq!(
            "prod".parse::<Environment>(),
            Err(ValidationError::UnknownEnvironment("prod".into()))
        );
    }

    #[test]
    fn test_endpoints() {
        assert_eq!(
            Environment::Live.redirect_url(),
            "https://sis.redsys.es/sis/realizarPago"
        );
        assert!(Environment::Test.soap_url().starts_with("https://sis-t.redsys.es:25443/"));
    }
}
