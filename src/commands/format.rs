/// Output format enum
///
/// Unified processing of the `--json` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable terminal output.
    #[default]
    Text,
    /// Machine-readable JSON output.
    Json,
}

impl OutputFormat {
    pub fn from_cli(json: bool) -> Self {
        if json { Self::Json } else { Self::Text }
    }

    /// Is it in JSON format?
    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json)
    }

    /// Get the effective colored setting (color disabled in JSON)
    pub fn effective_colored(&self, config_colored: bool) -> bool {
        !self.is_json() && config_colored
    }
}
