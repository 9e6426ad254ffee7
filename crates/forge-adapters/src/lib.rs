//! forge-adapters: steps de demostración sobre forge-core
//!
//! Este crate provee:
//! - Un catálogo de kinds de una build de aplicación sintética
//!   (`kinds`): fuentes, índice de clases, código generado, artefacto.
//! - Steps reutilizables (`steps`): scan → generate → assemble, más un
//!   step diferido de registro de beans para ejercitar el recorder.
//!
//! Nota: el core sólo conoce `ItemValue { kind, hash, payload, metadata }`.
//! Aquí los payloads son JSON estables para preservar determinismo.

pub mod kinds;
pub mod steps;
