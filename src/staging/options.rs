//! Options resolved by the caller before staging

/// Label used when the caller does not name the matrix
pub const DEFAULT_LABEL: &str = "matrix";

/// Options for [`super::stage`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageOptions {
    /// Copy host cells into the new allocation (default: true)
    pub copy_values: bool,
    /// Name used to tag diagnostics and errors (default: `"matrix"`)
    pub label: String,
}

impl Default for StageOptions {
    fn default() -> Self {
        Self {
            copy_values: true,
            label: DEFAULT_LABEL.to_string(),
        }
    }
}

impl StageOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate only, leaving device contents unset
    pub fn allocate_only() -> Self {
        Self::default().with_copy_values(false)
    }

    pub fn with_copy_values(mut self, copy_values: bool) -> Self {
        self.copy_values = copy_values;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}
