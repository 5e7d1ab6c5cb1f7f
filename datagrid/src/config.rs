//! Grid configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::pagination::DEFAULT_PAGE_SIZE;
use crate::record::DEFAULT_ROW_KEY_FIELD;

/// Tunables shared by every grid built from it.
///
/// Every field has a default, so a config document only needs the keys it
/// changes.
///
/// # Example
///
/// ```
/// use datagrid::GridConfig;
///
/// let config = GridConfig::default()
///     .with_page_size(20)
///     .with_load_error_message("Could not load users");
///
/// let parsed = GridConfig::from_json_str(r#"{"page_size": 50}"#).unwrap();
/// assert_eq!(parsed.page_size, 50);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Initial page size.
    ///
    /// Default: 10
    pub page_size: u32,

    /// Page sizes offered to the user.
    ///
    /// Default: 10, 20, 50, 100
    pub page_size_options: Vec<u32>,

    /// Refuse page sizes that are not in `page_size_options`.
    ///
    /// Default: false
    pub strict_page_sizes: bool,

    /// Start disabled.
    pub disabled: bool,

    /// Allow drag reordering within the loaded page.
    pub reorderable: bool,

    /// Record field used as the row key.
    ///
    /// Default: "id"
    pub row_key_field: String,

    /// Message shown when a fetch fails.
    pub load_error_message: String,

    /// Header of the synthesized actions column.
    pub actions_title: String,

    /// Width of the synthesized actions column.
    pub actions_width: Option<u16>,

    /// How long notifications stay visible, in milliseconds.
    ///
    /// Default: 4000
    pub notification_duration_ms: u64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page_size_options: vec![10, 20, 50, 100],
            strict_page_sizes: false,
            disabled: false,
            reorderable: false,
            row_key_field: DEFAULT_ROW_KEY_FIELD.to_string(),
            load_error_message: "Failed to load data".to_string(),
            actions_title: "Actions".to_string(),
            actions_width: Some(160),
            notification_duration_ms: 4000,
        }
    }
}

impl GridConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON document and validates it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GridConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants the grid relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        if self.page_size_options.is_empty() {
            return Err(ConfigError::EmptyPageSizeOptions);
        }
        if self.page_size_options.contains(&0) {
            return Err(ConfigError::ZeroPageSizeOption);
        }
        if !self.allows_page_size(self.page_size) {
            return Err(ConfigError::PageSizeNotAllowed(self.page_size));
        }
        Ok(())
    }

    /// Whether the user may switch to `page_size`.
    pub fn allows_page_size(&self, page_size: u32) -> bool {
        page_size > 0 && (!self.strict_page_sizes || self.page_size_options.contains(&page_size))
    }

    pub fn notification_duration(&self) -> Duration {
        Duration::from_millis(self.notification_duration_ms)
    }

    /// Sets the initial page size.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the page sizes offered to the user.
    pub fn with_page_size_options(mut self, options: Vec<u32>) -> Self {
        self.page_size_options = options;
        self
    }

    /// Only allow the configured page size options.
    pub fn with_strict_page_sizes(mut self, strict: bool) -> Self {
        self.strict_page_sizes = strict;
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn with_reorderable(mut self, reorderable: bool) -> Self {
        self.reorderable = reorderable;
        self
    }

    pub fn with_row_key_field(mut self, field: impl Into<String>) -> Self {
        self.row_key_field = field.into();
        self
    }

    pub fn with_load_error_message(mut self, message: impl Into<String>) -> Self {
        self.load_error_message = message.into();
        self
    }

    pub fn with_actions_title(mut self, title: impl Into<String>) -> Self {
        self.actions_title = title.into();
        self
    }

    pub fn with_actions_width(mut self, width: Option<u16>) -> Self {
        self.actions_width = width;
        self
    }

    pub fn with_notification_duration(mut self, duration: Duration) -> Self {
        self.notification_duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self
    }
}
