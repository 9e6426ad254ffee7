//! Valor neutral producido/consumido por steps.
//!
//! Un `ItemValue` es la unidad de datos intercambiada en el grafo. Es
//! neutral:
//! - `payload` es JSON genérico; el motor no interpreta su semántica.
//! - `hash` es calculado por el engine sobre el JSON canonicalizado y sirve
//!   como identidad para deduplicación y fingerprints.
//! - `metadata` permite anotar información auxiliar que no entra al hash.
//!
//! Una vez depositado en la tabla del run, un `ItemValue` es inmutable y se
//! comparte read-only entre todos sus consumidores.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::hashing::hash_value;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemValue {
    pub kind: String,
    pub hash: String,            // hash canónico del payload (asignado por engine)
    pub payload: Value,          // contenido neutro JSON
    pub metadata: Option<Value>, // información auxiliar (no entra al hash)
}

/// Salida declarada por un step antes de ser hasheada por el engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProducedItem {
    pub kind: String,
    pub payload: Value,
    pub metadata: Option<Value>,
}

impl ProducedItem {
    pub fn new(kind: impl Into<String>, payload: Value) -> Self {
        Self { kind: kind.into(),
               payload,
               metadata: None }
    }

    /// Marcador sin payload para kinds `Empty`.
    pub fn marker(kind: impl Into<String>) -> Self {
        Self::new(kind, Value::Null)
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Sella el valor calculando su hash canónico.
    pub(crate) fn into_value(self) -> ItemValue {
        let hash = hash_value(&self.payload);
        ItemValue { kind: self.kind,
                    hash,
                    payload: self.payload,
                    metadata: self.metadata }
    }
}
