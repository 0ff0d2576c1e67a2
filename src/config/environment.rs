// Start of file: /src/config/environment.rs

// * Environment configuration, loaded once behind a singleton.
// * Covers the server itself and the problem details builder.

use std::{borrow::Cow, collections::HashMap};
// * anyhow for convenient error handling
use anyhow::{anyhow, Context, Result};
// * once_cell for lazy static initialization
use once_cell::sync::Lazy;
use tracing::warn;

use crate::problem::{JsonFlags, DEFAULT_DETAIL_MESSAGE};
use crate::trap::Severity;

// ! Default values for environment variables (used if variables aren't set):
const DEFAULT_ENVIRONMENT: &str = "development";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_BODY_SIZE: usize = 2_097_152; // 2MB
const DEFAULT_TIMEOUT: u64 = 3; // 3 seconds

// * A struct containing all environment variables used by the app
#[derive(Clone, Debug)]
pub struct EnvironmentVariables {
    pub environment: Cow<'static, str>,
    pub host: Cow<'static, str>,
    pub port: u16,
    pub max_request_body_size: usize,
    pub default_timeout_seconds: u64,
    // * Problem details
    pub debug: bool,
    pub expose_failure_detail: bool,
    pub default_detail_message: Cow<'static, str>,
    pub json_flags: JsonFlags,
    pub error_reporting: Severity,
}

impl Default for EnvironmentVariables {
    fn default() -> Self {
        Self {
            environment: Cow::Borrowed(DEFAULT_ENVIRONMENT),
            host: Cow::Borrowed(DEFAULT_HOST),
            port: DEFAULT_PORT,
            max_request_body_size: DEFAULT_MAX_BODY_SIZE,
            default_timeout_seconds: DEFAULT_TIMEOUT,
            debug: false,
            expose_failure_detail: false,
            default_detail_message: Cow::Borrowed(DEFAULT_DETAIL_MESSAGE),
            json_flags: JsonFlags::default(),
            error_reporting: Severity::ALL,
        }
    }
}

impl EnvironmentVariables {
    // * Loads environment variables.
    // * Only reads .env if ENVIRONMENT != "production".
    pub fn load() -> Result<Self> {
        // ? In non-production environments, attempt to load .env
        if std::env::var("ENVIRONMENT").unwrap_or_default() != "production" {
            dotenv::dotenv().ok();
        }

        // * Collect all environment vars from the system and .env
        let vars: HashMap<String, String> = std::env::vars()
            .chain(dotenv::vars())
            .collect();

        Self::from_vars(&vars)
    }

    // * Builds the configuration from a set of key/value pairs, providing
    // * defaults for whatever is missing.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self> {
        // * A small helper closure to fetch a variable by key
        let get_var = |key: &str| {
            vars.get(key)
                .map(String::as_str)
                .filter(|s| !s.trim().is_empty())
        };

        Ok(Self {
            environment: get_var("ENVIRONMENT")
                .map(|s| Cow::Owned(s.into()))
                .unwrap_or_else(|| {
                    warn!("Missing ENVIRONMENT, defaulting to '{DEFAULT_ENVIRONMENT}'");
                    Cow::Borrowed(DEFAULT_ENVIRONMENT)
                }),

            host: get_var("HOST")
                .map(|s| Cow::Owned(s.into()))
                .unwrap_or(Cow::Borrowed(DEFAULT_HOST)),

            port: get_var("PORT")
                .map(|s| s.parse().context("Invalid PORT value"))
                .transpose()?
                .unwrap_or(DEFAULT_PORT),

            max_request_body_size: get_var("MAX_REQUEST_BODY_SIZE")
                .map(|s| s.parse().context("Invalid MAX_REQUEST_BODY_SIZE"))
                .transpose()?
                .unwrap_or(DEFAULT_MAX_BODY_SIZE),

            default_timeout_seconds: get_var("DEFAULT_TIMEOUT_SECONDS")
                .map(|s| s.parse().context("Invalid DEFAULT_TIMEOUT_SECONDS"))
                .transpose()?
                .unwrap_or(DEFAULT_TIMEOUT),

            debug: get_var("DEBUG")
                .map(|s| parse_bool(s).context("Invalid DEBUG"))
                .transpose()?
                .unwrap_or(false),

            expose_failure_detail: get_var("PROBLEM_DETAILS_EXPOSE_FAILURE_DETAIL")
                .map(|s| parse_bool(s).context("Invalid PROBLEM_DETAILS_EXPOSE_FAILURE_DETAIL"))
                .transpose()?
                .unwrap_or(false),

            default_detail_message: get_var("PROBLEM_DETAILS_DEFAULT_DETAIL")
                .map(|s| Cow::Owned(s.into()))
                .unwrap_or(Cow::Borrowed(DEFAULT_DETAIL_MESSAGE)),

            json_flags: get_var("PROBLEM_DETAILS_JSON_FLAGS")
                .map(|s| parse_json_flags(s).context("Invalid PROBLEM_DETAILS_JSON_FLAGS"))
                .transpose()?
                .unwrap_or_default(),

            error_reporting: get_var("ERROR_REPORTING")
                .map(|s| parse_severities(s).context("Invalid ERROR_REPORTING"))
                .transpose()?
                .unwrap_or(Severity::ALL),
        })
    }

    // * Returns a reference to the lazily-initialized environment configuration
    pub fn instance() -> Result<&'static Self> {
        static INSTANCE: Lazy<Result<EnvironmentVariables, anyhow::Error>> = Lazy::new(|| {
            let config: EnvironmentVariables = EnvironmentVariables::load()?;

            if cfg!(debug_assertions) {
                tracing::debug!("Loaded environment configuration: {:#?}", config);
            }

            Ok(config)
        });

        INSTANCE
            .as_ref()
            .map_err(|err| anyhow!("Failed to load environment configuration: {err:#}"))
    }

}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow!("expected a boolean, got '{other}'")),
    }
}

// * Comma separated flag names, e.g. "PRETTY_PRINT,UNESCAPED_SLASHES".
// * "NONE" turns every flag off.
fn parse_json_flags(value: &str) -> Result<JsonFlags> {
    if value.trim().eq_ignore_ascii_case("none") {
        return Ok(JsonFlags::empty());
    }

    value
        .split(',')
        .map(|name| {
            JsonFlags::parse_name(name)
                .ok_or_else(|| anyhow!("unknown JSON flag '{}'", name.trim()))
        })
        .try_fold(JsonFlags::empty(), |flags, flag| Ok(flags | flag?))
}

// * Comma separated severity names, e.g. "ERROR,WARNING" or "ALL".
fn parse_severities(value: &str) -> Result<Severity> {
    value
        .split(',')
        .map(|name| {
            Severity::parse_name(name).ok_or_else(|| anyhow!("unknown severity '{}'", name.trim()))
        })
        .try_fold(Severity::empty(), |mask, severity| Ok(mask | severity?))
}


// End of file: /src/config/environment.rs
