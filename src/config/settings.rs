//! User settings for TravelSplit

use serde::{Deserialize, Serialize};

use super::paths::SplitPaths;
use crate::audit::AuditLogger;
use crate::error::LedgerError;
use crate::models::{Money, DEFAULT_CATEGORIES};
use crate::session::ClearPolicy;
use crate::storage::file_io::write_json_atomic;

/// User settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Symbol shown in front of amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// What happens to guest expenses after they are carried over at sign-in
    #[serde(default)]
    pub migration_policy: ClearPolicy,

    /// Category labels offered when recording an expense
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,

    /// Whether service calls append to the audit log
    #[serde(default = "default_audit_enabled")]
    pub audit_enabled: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "€".to_string()
}

fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()
}

fn default_audit_enabled() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            migration_policy: ClearPolicy::default(),
            categories: default_categories(),
            audit_enabled: default_audit_enabled(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or return defaults if the file doesn't exist
    ///
    /// Defaults are not written; the caller decides when to persist.
    pub fn load_or_create(paths: &SplitPaths) -> Result<Self, LedgerError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| LedgerError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| LedgerError::Config(format!("Failed to parse settings file: {}", e)))
    }

    /// Save settings to disk
    pub fn save(&self, paths: &SplitPaths) -> Result<(), LedgerError> {
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
    }

    /// The configured category matching `label`, ignoring case and whitespace
    pub fn known_category(&self, label: &str) -> Option<&str> {
        let label = label.trim();
        self.categories
            .iter()
            .map(|c| c.trim())
            .find(|c| c.eq_ignore_ascii_case(label))
    }

    /// Audit logger for `paths`, or `None` when auditing is switched off
    pub fn audit_logger(&self, paths: &SplitPaths) -> Option<AuditLogger> {
        self.audit_enabled.then(|| AuditLogger::new(paths.audit_log()))
    }

    /// Format an amount with the configured currency symbol
    pub fn format_amount(&self, amount: Money) -> String {
        amount.format_with_symbol(&self.currency_symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.currency_symbol, "€");
        assert_eq!(settings.migration_policy, ClearPolicy::RetainFailed);
        assert_eq!(settings.categories, vec!["Food", "Lodging", "Vehicle", "Other"]);
        assert_eq!(settings.known_category(" food "), Some("Food"));
        assert_eq!(settings.known_category("Souvenirs"), None);
    }

    #[test]
    fn test_audit_logger_follows_toggle() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SplitPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        let logger = settings.audit_logger(&paths).unwrap();
        assert_eq!(logger.path(), &paths.audit_log());

        settings.audit_enabled = false;
        assert!(settings.audit_logger(&paths).is_none());
    }

    #[test]
    fn test_format_amount_uses_currency_symbol() {
        let mut settings = Settings::default();
        assert_eq!(settings.format_amount(Money::from_cents(1250)), "€12.50");

        settings.currency_symbol = "$".into();
        assert_eq!(settings.format_amount(Money::from_cents(-300)), "-$3.00");
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SplitPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(Settings::load_or_create(&paths).unwrap(), Settings::default());

        let mut settings = Settings::default();
        settings.currency_symbol = "$".into();
        settings.migration_policy = ClearPolicy::Unconditional;
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let loaded: Settings = serde_json::from_str(r#"{"currency_symbol": "£"}"#).unwrap();
        assert_eq!(loaded.currency_symbol, "£");
        assert_eq!(loaded.schema_version, 1);
        assert_eq!(loaded.migration_policy, ClearPolicy::RetainFailed);
        assert!(loaded.audit_enabled);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SplitPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), "{oops").unwrap();

        let err = Settings::load_or_create(&paths).unwrap_err();
        assert!(matches!(err, LedgerError::Config(_)));
    }
}
