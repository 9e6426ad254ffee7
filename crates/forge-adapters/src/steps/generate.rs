//! Generadores de código: cada uno aporta fragmentos a `generated.code` y
//! descriptores a `bean.definitions`.

use forge_core::{ProducedItem, StepBuilder, StepContext, StepDescriptor, StepRunResult};
use serde_json::json;

use crate::kinds;

/// Endpoints REST derivados del índice de clases.
pub fn generate_rest_endpoints() -> StepDescriptor {
    StepBuilder::new("generate-rest-endpoints")
        .consumes(kinds::CLASS_INDEX)
        .produces(kinds::GENERATED_CODE)
        .produces(kinds::BEAN_DEFINITIONS)
        .action(|ctx: &mut StepContext<'_>| {
            let entries = ctx.single(kinds::CLASS_INDEX)
                             .and_then(|v| v.payload.get("entries").cloned())
                             .unwrap_or(json!([]));
            StepRunResult::success(vec![
                ProducedItem::new(kinds::GENERATED_CODE,
                                  json!({ "unit": "rest-endpoints", "derived_from": entries })),
                ProducedItem::new(kinds::BEAN_DEFINITIONS,
                                  json!({ "bean": "RestRouter", "scope": "singleton" })),
            ])
        })
}

/// Accessors de configuración. Prioridad alta: otros generadores pueden
/// asumir que la configuración tipada ya existe.
pub fn generate_config_code() -> StepDescriptor {
    StepBuilder::new("generate-config-code")
        .consumes(kinds::CLASS_INDEX)
        .produces(kinds::GENERATED_CODE)
        .priority(10)
        .action(|_ctx: &mut StepContext<'_>| {
            StepRunResult::success(vec![ProducedItem::new(
                kinds::GENERATED_CODE,
                json!({ "unit": "config-accessors", "keys": ["http.port", "app.name"] }),
            )])
        })
}
