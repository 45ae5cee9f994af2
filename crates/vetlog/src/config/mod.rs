use std::collections::BTreeSet;
use std::env;
use std::fmt;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub accounts: AccountConfig,
    pub messaging: MessagingConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let allowed_country_codes = AccountConfig::parse_country_codes(
            &env::var("APP_ALLOWED_COUNTRY_CODES").unwrap_or_else(|_| "US,MX".to_string()),
        )?;

        let password_cost =
            AccountConfig::parse_password_cost(env::var("APP_PASSWORD_COST").ok().as_deref())?;

        let client_token = match env::var("APP_MESSAGING_TOKEN") {
            Ok(token) if !token.trim().is_empty() => token,
            _ if environment == AppEnvironment::Production => {
                return Err(ConfigError::MissingVariable("APP_MESSAGING_TOKEN"))
            }
            _ => String::new(),
        };

        let adoption_template =
            env::var("APP_TEMPLATE_ADOPTION").unwrap_or_else(|_| "adoption".to_string());
        let welcome_template =
            env::var("APP_TEMPLATE_WELCOME").unwrap_or_else(|_| "welcome".to_string());
        let forgot_template =
            env::var("APP_TEMPLATE_FORGOT").unwrap_or_else(|_| "forgot".to_string());
        let base_url =
            env::var("APP_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());
        let forgot_path = env::var("APP_TEMPLATE_FORGOT_PATH")
            .unwrap_or_else(|_| "/recovery/forgot/".to_string());

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            accounts: AccountConfig {
                allowed_country_codes,
                password_cost,
            },
            messaging: MessagingConfig {
                client_token,
                adoption_template,
                welcome_template,
                forgot_template,
                base_url,
                forgot_path,
            },
        })
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Registration rules for new accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountConfig {
    /// Country codes whose accounts are enabled at registration. Everyone else confirms by e-mail.
    pub allowed_country_codes: BTreeSet<String>,
    /// bcrypt work factor for stored passwords.
    pub password_cost: u32,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            allowed_country_codes: BTreeSet::new(),
            password_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl AccountConfig {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            allowed_country_codes: codes
                .into_iter()
                .map(|code| normalize_country_code(code.as_ref()))
                .filter(|code| !code.is_empty())
                .collect(),
            ..Self::default()
        }
    }

    pub fn with_password_cost(mut self, cost: u32) -> Self {
        self.password_cost = cost;
        self
    }

    pub fn allows(&self, country_code: &str) -> bool {
        self.allowed_country_codes
            .contains(&normalize_country_code(country_code))
    }

    fn parse_password_cost(raw: Option<&str>) -> Result<u32, ConfigError> {
        let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
            return Ok(bcrypt::DEFAULT_COST);
        };
        match raw.parse::<u32>() {
            Ok(cost) if (MIN_PASSWORD_COST..=MAX_PASSWORD_COST).contains(&cost) => Ok(cost),
            _ => Err(ConfigError::InvalidPasswordCost(raw.to_string())),
        }
    }

    fn parse_country_codes(raw: &str) -> Result<BTreeSet<String>, ConfigError> {
        let mut codes = BTreeSet::new();
        for code in raw.split(',').map(normalize_country_code) {
            if code.is_empty() {
                continue;
            }
            if !code.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '+') {
                return Err(ConfigError::InvalidCountryCode(code));
            }
            codes.insert(code);
        }
        Ok(codes)
    }
}

const MIN_PASSWORD_COST: u32 = 4;
const MAX_PASSWORD_COST: u32 = 31;

fn normalize_country_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// Outbound messaging settings shared by the adoption, welcome and recovery notifications.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessagingConfig {
    pub client_token: String,
    pub adoption_template: String,
    pub welcome_template: String,
    pub forgot_template: String,
    pub base_url: String,
    /// Path between `base_url` and the recovery token in the forgot-password link.
    pub forgot_path: String,
}

impl MessagingConfig {
    pub fn recovery_link(&self, token: &str) -> String {
        format!("{}{}{}", self.base_url, self.forgot_path, token)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    MissingVariable(&'static str),
    InvalidCountryCode(String),
    InvalidPasswordCost(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingVariable(name) => write!(f, "{name} must be set"),
            ConfigError::InvalidCountryCode(code) => {
                write!(f, "APP_ALLOWED_COUNTRY_CODES contains invalid code '{code}'")
            }
            ConfigError::InvalidPasswordCost(value) => {
                write!(f, "APP_PASSWORD_COST must be between 4 and 31, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
