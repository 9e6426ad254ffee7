use serde::{Deserialize, Serialize};

/// Multiplicidad de un kind: gobierna cuántos productores activos admite y
/// bajo qué forma lo ve un consumidor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Multiplicity {
    /// A lo sumo un productor activo; el consumidor ve exactamente una
    /// instancia (o `Absent` si el consumo era opcional).
    Single,
    /// Cualquier número de productores; el consumidor ve la colección
    /// completa acumulada de todos ellos.
    Multi,
    /// Marcador sin payload, usado únicamente para ordenar steps.
    Empty,
}

/// Declaración estática de una categoría de build item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemKind {
    pub id: String,
    pub multiplicity: Multiplicity,
}

impl ItemKind {
    pub fn single(id: impl Into<String>) -> Self {
        Self { id: id.into(),
               multiplicity: Multiplicity::Single }
    }

    pub fn multi(id: impl Into<String>) -> Self {
        Self { id: id.into(),
               multiplicity: Multiplicity::Multi }
    }

    pub fn marker(id: impl Into<String>) -> Self {
        Self { id: id.into(),
               multiplicity: Multiplicity::Empty }
    }
}
