use serde::{Deserialize, Serialize};

/// Fase de ejecución de un step.
///
/// El orden de los variantes define el orden entre fases en el desempate del
/// scheduler: procesamiento primero, luego las fases diferidas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ExecutionPhase {
    /// Ejecuta síncrono e inline durante el build.
    ProcessingTime,
    /// Sus llamadas se capturan para replay en static init de la aplicación.
    StaticInit,
    /// Sus llamadas se capturan para replay en runtime init.
    RuntimeInit,
}

impl ExecutionPhase {
    /// Las fases diferidas redirigen efectos al recorder en vez de
    /// ejecutarlos contra un target vivo.
    pub fn is_deferred(self) -> bool {
        matches!(self, ExecutionPhase::StaticInit | ExecutionPhase::RuntimeInit)
    }
}
