//! Descriptor inmutable de un step.

use std::sync::Arc;

use super::{ExecutionPhase, StepAction, StepCondition};
use crate::context::BuildContext;

/// Entrada del consumes-set: kind + si es requerido u opcional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Consume {
    pub kind: String,
    pub optional: bool,
}

/// Entrada del produces-set. Un produce `weak` no arrastra por sí solo al
/// step dentro de la cadena durante el pruning; sólo cuenta si el step ya
/// es requerido por otra razón.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Produce {
    pub kind: String,
    pub weak: bool,
}

/// Hint explícito de orden relativo a otro step, por id. Se materializa como
/// arista adicional del grafo y participa del chequeo de ciclos igual que
/// las aristas de producción.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderHint {
    Before(String),
    After(String),
}

/// Declaración completa de un step: identidad, contrato de IO, fase,
/// condición de activación, hints de orden y la acción a ejecutar.
///
/// Inmutable una vez registrado en el `ChainBuilder`.
#[derive(Clone)]
pub struct StepDescriptor {
    pub(crate) id: String,
    pub(crate) consumes: Vec<Consume>,
    pub(crate) produces: Vec<Produce>,
    pub(crate) phase: ExecutionPhase,
    pub(crate) priority: i32,
    pub(crate) order_hints: Vec<OrderHint>,
    pub(crate) condition: Option<StepCondition>,
    /// Step con efectos visibles fuera del grafo (p.ej. registro de
    /// metadata): el pruning nunca lo elimina aunque nada consuma sus
    /// outputs.
    pub(crate) side_effect: bool,
    pub(crate) action: Arc<dyn StepAction>,
}

impl StepDescriptor {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn consumes(&self) -> &[Consume] {
        &self.consumes
    }

    pub fn produces(&self) -> &[Produce] {
        &self.produces
    }

    pub fn phase(&self) -> ExecutionPhase {
        self.phase
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn order_hints(&self) -> &[OrderHint] {
        &self.order_hints
    }

    pub fn is_side_effect(&self) -> bool {
        self.side_effect
    }

    /// Evalúa la condición de activación contra el contexto del run.
    pub fn is_active(&self, ctx: &BuildContext) -> bool {
        self.condition.as_ref().map(|c| c.evaluate(ctx)).unwrap_or(true)
    }

    /// Razón de desactivación para diagnósticos (sólo si hay condición).
    pub fn deactivation_reason(&self) -> Option<String> {
        self.condition.as_ref().map(|c| c.deactivation_reason())
    }

    pub fn declares_produce(&self, kind: &str) -> bool {
        self.produces.iter().any(|p| p.kind == kind)
    }

    pub fn declares_consume(&self, kind: &str) -> bool {
        self.consumes.iter().any(|c| c.kind == kind)
    }

    pub(crate) fn action(&self) -> &dyn StepAction {
        self.action.as_ref()
    }
}

impl std::fmt::Debug for StepDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepDescriptor")
         .field("id", &self.id)
         .field("consumes", &self.consumes)
         .field("produces", &self.produces)
         .field("phase", &self.phase)
         .field("priority", &self.priority)
         .field("side_effect", &self.side_effect)
         .finish_non_exhaustive()
    }
}
