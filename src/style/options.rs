//! Engine configuration.

use serde::{Deserialize, Serialize};

/// What a table-wide operation does when one cell fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop at the first failure and restore the table (default)
    #[default]
    Atomic,
    /// Keep going and list failures in the report
    BestEffort,
}

/// How borders are written when a cell already has edge definitions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderMode {
    /// Replace an existing edge of the same name (default)
    #[default]
    Replace,
    /// Always append; repeated application accumulates edges
    Accumulate,
}

/// How sub-range text formatting rebuilds the paragraph's runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitMode {
    /// Split only the runs at the range boundaries, keeping their formatting
    #[default]
    Preserve,
    /// Replace every run with plain prefix / formatted target / plain suffix
    Flatten,
}

/// Options for style operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    /// Multi-cell failure handling
    pub failure_policy: FailurePolicy,

    /// Border write mode
    pub border_mode: BorderMode,

    /// Run splitting mode
    pub split_mode: SplitMode,

    /// Table border width in eighths of a point
    pub border_size: u32,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::Atomic,
            border_mode: BorderMode::Replace,
            split_mode: SplitMode::Preserve,
            border_size: 4,
        }
    }
}

impl FormatOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options reproducing the historical behavior: best-effort tables,
    /// accumulating borders, flattened runs.
    pub fn legacy() -> Self {
        Self {
            failure_policy: FailurePolicy::BestEffort,
            border_mode: BorderMode::Accumulate,
            split_mode: SplitMode::Flatten,
            border_size: 4,
        }
    }

    /// Set the failure policy.
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Continue past failing cells.
    pub fn best_effort(mut self) -> Self {
        self.failure_policy = FailurePolicy::BestEffort;
        self
    }

    /// Set the border mode.
    pub fn with_border_mode(mut self, mode: BorderMode) -> Self {
        self.border_mode = mode;
        self
    }

    /// Set the split mode.
    pub fn with_split_mode(mut self, mode: SplitMode) -> Self {
        self.split_mode = mode;
        self
    }

    /// Set the table border width (eighths of a point, clamped to 2..=96).
    pub fn with_border_size(mut self, size: u32) -> Self {
        self.border_size = size.clamp(2, 96);
        self
    }
}
