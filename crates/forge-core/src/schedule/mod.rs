//! Agenda y ejecución de la cadena.
//!
//! `schedule` produce el orden topológico determinista; `ChainEngine` lo
//! recorre ejecutando steps, enhebrando los valores producidos hacia los
//! inputs de sus consumidores y redirigiendo las fases diferidas al
//! recorder.

mod engine;
mod record;
mod scheduler;

pub use engine::ChainEngine;
pub use record::ExecutionRecord;
pub use scheduler::schedule;
