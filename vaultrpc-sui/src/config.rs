//! Ledger client configuration.

use vaultrpc_core::config::{ENV_COIN_TYPE, ENV_GAS_BUDGET, ENV_PACKAGE_ID, EnvVars};
use vaultrpc_core::error::{ConfigValidationError, ValidationResult};
use vaultrpc_core::types::Address;

/// Default gas budget in MIST.
pub const DEFAULT_GAS_BUDGET: u64 = 10_000_000;

/// Native coin type.
pub const DEFAULT_COIN_TYPE: &str = "0x2::sui::SUI";

/// Settings for building vault transactions.
///
/// # Example
///
/// ```rust
/// use vaultrpc_sui::SuiConfig;
///
/// let config = SuiConfig::from_vars([
///     ("VAULTRPC_PACKAGE_ID", "0x1234567890abcdef1234567890abcdef12345678"),
///     ("VAULTRPC_GAS_BUDGET", "20000000"),
/// ])
/// .unwrap();
/// assert_eq!(config.gas_budget, 20_000_000);
/// assert_eq!(config.coin_type, "0x2::sui::SUI");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiConfig {
    /// Address of the published vault package.
    pub package_id: Option<Address>,
    /// Gas budget attached to every built transaction.
    pub gas_budget: u64,
    /// Coin type passed as the type argument of vault calls.
    pub coin_type: String,
}

impl Default for SuiConfig {
    fn default() -> Self {
        Self {
            package_id: None,
            gas_budget: DEFAULT_GAS_BUDGET,
            coin_type: DEFAULT_COIN_TYPE.to_string(),
        }
    }
}

impl SuiConfig {
    /// Creates a configuration targeting `package_id`.
    pub fn new(package_id: Address) -> Self {
        Self {
            package_id: Some(package_id),
            ..Self::default()
        }
    }

    /// Sets the gas budget.
    pub fn with_gas_budget(mut self, gas_budget: u64) -> Self {
        self.gas_budget = gas_budget;
        self
    }

    /// Sets the coin type.
    pub fn with_coin_type(mut self, coin_type: impl Into<String>) -> Self {
        self.coin_type = coin_type.into();
        self
    }

    /// Reads `VAULTRPC_PACKAGE_ID`, `VAULTRPC_GAS_BUDGET` and `VAULTRPC_COIN_TYPE`.
    pub fn from_env() -> Result<Self, ConfigValidationError> {
        Self::from_env_vars(&EnvVars::from_env())
    }

    /// Like [`from_env`](Self::from_env), over an explicit key/value source.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigValidationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::from_env_vars(&EnvVars::from_vars(vars))
    }

    /// Builds the configuration from a captured environment.
    pub fn from_env_vars(env: &EnvVars) -> Result<Self, ConfigValidationError> {
        env.check_recognized()?;

        let mut config = Self {
            package_id: env.parse::<Address>(ENV_PACKAGE_ID)?,
            ..Self::default()
        };
        if let Some(budget) = env.parse::<u64>(ENV_GAS_BUDGET)? {
            config.gas_budget = budget;
        }
        if let Some(coin_type) = env.get(ENV_COIN_TYPE) {
            config.coin_type = coin_type.to_string();
        }

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// A missing package id is only a warning: read-only queries work
    /// without it, vault transactions fail with `NotConfigured`.
    pub fn validate(&self) -> Result<ValidationResult, ConfigValidationError> {
        let mut warnings = Vec::new();

        if self.gas_budget == 0 {
            return Err(ConfigValidationError::too_low("gas_budget", 0, 1));
        }

        let coin_type = self.coin_type.trim();
        if coin_type.split("::").count() != 3 {
            return Err(ConfigValidationError::invalid(
                "coin_type",
                format!("expected address::module::Name, got {coin_type:?}"),
            ));
        }

        if self.package_id.is_none() {
            warnings.push("package_id is not set; vault transactions are unavailable".to_string());
        }

        Ok(ValidationResult::with_warnings(warnings))
    }
}
