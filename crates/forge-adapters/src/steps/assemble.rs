//! Ensamblado final del artefacto.

use forge_core::{ProducedItem, StepBuilder, StepContext, StepDescriptor, StepRunResult};
use serde_json::json;

use crate::kinds;

/// Junta el índice y todo el código generado en `app.artifact`.
/// `config.frozen` es opcional: sin beans registrados la build sigue
/// siendo válida.
pub fn assemble_artifact() -> StepDescriptor {
    StepBuilder::new("assemble-artifact")
        .consumes(kinds::CLASS_INDEX)
        .consumes(kinds::GENERATED_CODE)
        .consumes_optional(kinds::CONFIG_FROZEN)
        .produces(kinds::APP_ARTIFACT)
        .action(|ctx: &mut StepContext<'_>| {
            let index_hash = match ctx.single(kinds::CLASS_INDEX) {
                Some(v) => v.hash.clone(),
                None => {
                    return StepRunResult::failure(forge_core::ChainBuildError::Internal(
                        "class index missing at assembly".into(),
                    ))
                }
            };
            let units: Vec<_> = ctx.multi(kinds::GENERATED_CODE)
                                   .iter()
                                   .map(|v| v.payload.get("unit").cloned().unwrap_or(json!(null)))
                                   .collect();
            let config_frozen = !ctx.input(kinds::CONFIG_FROZEN).is_absent();
            StepRunResult::success(vec![ProducedItem::new(
                kinds::APP_ARTIFACT,
                json!({ "index_hash": index_hash,
                        "generated_units": units,
                        "config_frozen": config_frozen,
                        "schema_version": 1 }),
            )])
        })
}
