//! Catálogo in-memory de kinds registrados.
//!
//! Puramente aditivo y sin I/O. El registro es idempotente para la misma
//! declaración; redeclarar un id con otra multiplicidad es un
//! `DuplicateKind` fatal (se detecta en tiempo de registro, antes de
//! construir el grafo).

use indexmap::IndexMap;

use super::{ItemKind, Multiplicity};
use crate::errors::ChainBuildError;

#[derive(Debug, Default, Clone)]
pub struct KindRegistry {
    kinds: IndexMap<String, Multiplicity>,
}

impl KindRegistry {
    pub fn new() -> Self {
        Self { kinds: IndexMap::new() }
    }

    /// Registra un kind. Idempotente si la declaración coincide exactamente.
    pub fn register(&mut self, kind: ItemKind) -> Result<(), ChainBuildError> {
        match self.kinds.get(&kind.id) {
            None => {
                self.kinds.insert(kind.id, kind.multiplicity);
                Ok(())
            }
            Some(existing) if *existing == kind.multiplicity => Ok(()),
            Some(existing) => Err(ChainBuildError::DuplicateKind { kind: kind.id,
                                                                   existing: *existing,
                                                                   requested: kind.multiplicity }),
        }
    }

    /// Multiplicidad de un kind registrado, si existe.
    pub fn multiplicity_of(&self, id: &str) -> Option<Multiplicity> {
        self.kinds.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.kinds.contains_key(id)
    }

    /// Ids registrados en orden de declaración.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.kinds.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}
