//! Report generation configuration.

use serde::{Deserialize, Serialize};

/// Settings for rendered release reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Locale used when the caller does not pass one (`"en"`, `"it"`).
    #[serde(default = "default_locale")]
    pub default_locale: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            default_locale: default_locale(),
        }
    }
}

fn default_locale() -> String {
    "en".to_string()
}
