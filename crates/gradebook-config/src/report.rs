use std::env;

/// Settings for generated PDF documents.
#[derive(Clone, Debug)]
pub struct ReportConfig {
    /// Printed in the header of bulletins and course reports
    pub school_name: String,
}

impl ReportConfig {
    pub fn from_env() -> Self {
        Self {
            school_name: env::var("SCHOOL_NAME")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "Gradebook School".to_string()),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            school_name: "Gradebook School".to_string(),
        }
    }
}
