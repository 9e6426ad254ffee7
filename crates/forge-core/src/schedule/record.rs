//! Registro de ejecución: el resultado observable de un run completo.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::item::ItemValue;
use crate::recorder::InstructionSeq;

/// Resultado de un run exitoso. Un run que falla no produce ningún record
/// parcial: o está completo o no existe.
///
/// Los valores intermedios se liberan durante la ejecución cuando su último
/// consumidor terminó; aquí sólo sobreviven los outputs de kinds finales.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRecord {
    pub run_id: Uuid,
    /// Ids de steps en el orden realmente ejecutado.
    pub order: Vec<String>,
    /// Valores de los kinds finales, por kind.
    pub outputs: IndexMap<String, Vec<ItemValue>>,
    /// Fingerprint por step ejecutado, en orden de ejecución.
    pub step_fingerprints: Vec<String>,
    /// Fingerprint agregado del run: mismo input, mismo fingerprint.
    pub chain_fingerprint: String,
    /// Instrucciones capturadas de steps `StaticInit`, en orden de emisión.
    pub static_init: InstructionSeq,
    /// Instrucciones capturadas de steps `RuntimeInit`, en orden de emisión.
    pub runtime_init: InstructionSeq,
}

impl ExecutionRecord {
    /// Valores del kind final dado (vacío si no se declaró o no produjo).
    pub fn output(&self, kind: &str) -> &[ItemValue] {
        self.outputs.get(kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn executed(&self, step_id: &str) -> bool {
        self.order.iter().any(|id| id == step_id)
    }
}
