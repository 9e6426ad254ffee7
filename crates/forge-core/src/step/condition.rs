//! Condición de activación de un step.
//!
//! Un step con condición falsa queda excluido ANTES de construir el grafo y
//! no produce ninguno de sus outputs declarados; si otro step requería uno
//! de esos outputs, la validación falla nombrando a este productor inactivo
//! y su razón (nunca un fallo silencioso).

use std::fmt;
use std::sync::Arc;

use crate::context::BuildContext;

type Predicate = Arc<dyn Fn(&BuildContext) -> bool + Send + Sync>;

#[derive(Clone)]
pub struct StepCondition {
    description: String,
    predicate: Predicate,
}

impl StepCondition {
    /// Condición arbitraria. La descripción aparece en diagnósticos cuando
    /// el step queda desactivado; debe nombrar la condición, no el step.
    pub fn new(description: impl Into<String>,
               predicate: impl Fn(&BuildContext) -> bool + Send + Sync + 'static)
               -> Self {
        Self { description: description.into(),
               predicate: Arc::new(predicate) }
    }

    /// Activa sólo si el flag booleano está presente y es `true`.
    pub fn flag_enabled(flag: &str) -> Self {
        let name = flag.to_string();
        Self::new(format!("flag '{name}' enabled"), move |ctx| ctx.flag(&name))
    }

    /// Activa sólo si el flag está ausente o es `false`.
    pub fn flag_disabled(flag: &str) -> Self {
        let name = flag.to_string();
        Self::new(format!("flag '{name}' disabled"), move |ctx| !ctx.flag(&name))
    }

    pub fn evaluate(&self, ctx: &BuildContext) -> bool {
        (self.predicate)(ctx)
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Razón legible usada por diagnósticos cuando la condición es falsa.
    pub fn deactivation_reason(&self) -> String {
        format!("condition '{}' evaluated to false", self.description)
    }
}

impl fmt::Debug for StepCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepCondition")
         .field("description", &self.description)
         .finish_non_exhaustive()
    }
}
