//! Build items: kinds tipados, registro de kinds y valores neutrales que
//! fluyen entre steps.
//!
//! Un "kind" identifica una categoría de datos del grafo; su multiplicidad
//! gobierna cuántos productores admite y qué ve el consumidor. Los valores
//! (`ItemValue`) son JSON neutro: el motor no interpreta su semántica.

mod input;
mod kind;
mod registry;
mod value;

pub use input::ConsumedInput;
pub use kind::{ItemKind, Multiplicity};
pub use registry::KindRegistry;
pub use value::{ItemValue, ProducedItem};
