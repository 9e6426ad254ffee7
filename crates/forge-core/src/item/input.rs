//! Protocolo de entrada de un step: lo que el consumidor ve para cada kind
//! declarado en su consumes-set.
//!
//! Invariante: un consumo opcional sin productores activos se materializa
//! como `Absent`, un valor de primera clase — nunca un null implícito.

use super::ItemValue;

#[derive(Debug, Clone, PartialEq)]
pub enum ConsumedInput {
    /// Instancia única de un kind `Single`.
    Single(ItemValue),
    /// Colección completa acumulada de un kind `Multi` (todos los
    /// productores ejecutaron antes que este consumidor).
    Multi(Vec<ItemValue>),
    /// Kind `Empty` presente: sólo ordena, no transporta datos.
    Marker,
    /// Consumo opcional sin productores activos.
    Absent,
}

impl ConsumedInput {
    /// Instancia única si el kind era `Single` y está presente.
    pub fn single(&self) -> Option<&ItemValue> {
        match self {
            ConsumedInput::Single(v) => Some(v),
            _ => None,
        }
    }

    /// Colección de un kind `Multi`; vacía para `Absent`.
    pub fn multi(&self) -> &[ItemValue] {
        match self {
            ConsumedInput::Multi(vs) => vs,
            _ => &[],
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, ConsumedInput::Absent)
    }
}
