use serde::Deserialize;

/// Engine-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// The maximum number of authoritative layouts requested before the run
    /// fails with a convergence error. Values below 1 are treated as 1.
    ///
    /// Defaults to `3`.
    pub max_passes: usize,
    /// Namespace under which function values are attached to rendered nodes.
    ///
    /// Defaults to `"tally"`.
    pub attribute_namespace: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_passes: 3,
            attribute_namespace: "tally".to_string(),
        }
    }
}

/// Everything a pagination run needs besides the report itself. Passed
/// explicitly; there is no process-wide engine state.
#[derive(Debug, Clone, Default)]
pub struct EvaluationContext {
    config: EngineConfig,
}

impl EvaluationContext {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn max_passes(&self) -> usize {
        self.config.max_passes.max(1)
    }

    pub fn namespace(&self) -> &str {
        &self.config.attribute_namespace
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"maxPasses": 0}"#).unwrap();
        assert_eq!(config.attribute_namespace, "tally");

        let ctx = EvaluationContext::new(config);
        assert_eq!(ctx.max_passes(), 1);
    }
}
