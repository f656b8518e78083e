//! Engine configuration.

/// Integrity engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum field writes in a single plan.
    ///
    /// Unlimited by default; callers that need to bound the work done inside
    /// one removal opt in with [`with_max_plan_operations`](Self::with_max_plan_operations).
    pub max_plan_operations: Option<usize>,

    /// Refuse removals of types the registry does not know.
    ///
    /// When false, such removals get an empty plan.
    pub require_config: bool,

    /// Skip references to entities that no longer exist instead of failing.
    pub skip_dangling: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_plan_operations: None,
            require_config: false,
            skip_dangling: true,
        }
    }
}

impl EngineConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the plan operation budget.
    pub fn with_max_plan_operations(mut self, max: usize) -> Self {
        self.max_plan_operations = Some(max);
        self
    }

    /// Remove the plan operation budget.
    pub fn without_plan_budget(mut self) -> Self {
        self.max_plan_operations = None;
        self
    }

    /// Require every removed type to be registered.
    pub fn with_require_config(mut self, require: bool) -> Self {
        self.require_config = require;
        self
    }

    /// Fail on dangling references instead of skipping them.
    pub fn strict_references(mut self) -> Self {
        self.skip_dangling = false;
        self
    }

    /// Check if a plan of `operations` writes fits the budget.
    pub fn within_budget(&self, operations: usize) -> bool {
        self.max_plan_operations
            .map_or(true, |limit| operations <= limit)
    }
}
