use crate::{errors::ChainBuildError, item::ProducedItem};

/// Resultado abstracto de ejecutar un step.
pub enum StepRunResult {
    Success { outputs: Vec<ProducedItem> },
    Failure { error: ChainBuildError },
}

impl StepRunResult {
    /// Éxito sin outputs (steps de sólo efectos o de sólo grabación).
    pub fn empty() -> Self {
        StepRunResult::Success { outputs: Vec::new() }
    }

    pub fn success(outputs: Vec<ProducedItem>) -> Self {
        StepRunResult::Success { outputs }
    }

    pub fn failure(error: ChainBuildError) -> Self {
        StepRunResult::Failure { error }
    }
}
