//! Definiciones relacionadas a Steps.
//!
//! Un step es una unidad de trabajo de build con inputs/outputs tipados por
//! kind. Este módulo define:
//! - `StepDescriptor`: la declaración inmutable (consumes, produces, fase,
//!   condición de activación, hints de orden).
//! - `StepAction`: la interfaz neutral que el engine invoca.
//! - `StepBuilder`: construcción fluida de descriptores.
//! - `StepRunResult` y `StepContext` (protocolo de ejecución).

mod action;
mod builder;
mod condition;
mod descriptor;
mod phase;
mod run_result;

pub use action::{StepAction, StepContext};
pub use builder::StepBuilder;
pub use condition::StepCondition;
pub use descriptor::{Consume, OrderHint, Produce, StepDescriptor};
pub use phase::ExecutionPhase;
pub use run_result::StepRunResult;
