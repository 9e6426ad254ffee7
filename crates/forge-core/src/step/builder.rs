//! Builder fluido para `StepDescriptor`.
//!
//! La configuración presente en el builder al llamar `build()` es la que
//! aplica al step dentro de la cadena; el descriptor resultante es
//! inmutable.

use std::sync::Arc;

use super::{Consume, ExecutionPhase, OrderHint, Produce, StepAction, StepCondition, StepDescriptor};

pub struct StepBuilder {
    id: String,
    consumes: Vec<Consume>,
    produces: Vec<Produce>,
    phase: ExecutionPhase,
    priority: i32,
    order_hints: Vec<OrderHint>,
    condition: Option<StepCondition>,
    side_effect: bool,
}

impl StepBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(),
               consumes: Vec::new(),
               produces: Vec::new(),
               phase: ExecutionPhase::ProcessingTime,
               priority: 0,
               order_hints: Vec::new(),
               condition: None,
               side_effect: false }
    }

    /// Declara un consumo requerido.
    pub fn consumes(mut self, kind: impl Into<String>) -> Self {
        self.consumes.push(Consume { kind: kind.into(),
                                     optional: false });
        self
    }

    /// Declara un consumo opcional: sin productores activos, el step recibe
    /// `Absent` en vez de fallar la validación.
    pub fn consumes_optional(mut self, kind: impl Into<String>) -> Self {
        self.consumes.push(Consume { kind: kind.into(),
                                     optional: true });
        self
    }

    pub fn produces(mut self, kind: impl Into<String>) -> Self {
        self.produces.push(Produce { kind: kind.into(),
                                     weak: false });
        self
    }

    /// Produce débil: no arrastra al step dentro de la cadena por sí solo.
    pub fn produces_weak(mut self, kind: impl Into<String>) -> Self {
        self.produces.push(Produce { kind: kind.into(),
                                     weak: true });
        self
    }

    pub fn phase(mut self, phase: ExecutionPhase) -> Self {
        self.phase = phase;
        self
    }

    /// Prioridad de desempate entre steps listos simultáneamente: mayor
    /// prioridad ejecuta antes. Default 0.
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn runs_before(mut self, other_id: impl Into<String>) -> Self {
        self.order_hints.push(OrderHint::Before(other_id.into()));
        self
    }

    pub fn runs_after(mut self, other_id: impl Into<String>) -> Self {
        self.order_hints.push(OrderHint::After(other_id.into()));
        self
    }

    pub fn enabled_when(mut self, condition: StepCondition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Marca el step como side-effecting: el pruning nunca lo elimina.
    /// Requerido para steps con produces-set vacío.
    pub fn side_effect(mut self) -> Self {
        self.side_effect = true;
        self
    }

    pub fn action(self, action: impl StepAction + 'static) -> StepDescriptor {
        StepDescriptor { id: self.id,
                         consumes: self.consumes,
                         produces: self.produces,
                         phase: self.phase,
                         priority: self.priority,
                         order_hints: self.order_hints,
                         condition: self.condition,
                         side_effect: self.side_effect,
                         action: Arc::new(action) }
    }
}
