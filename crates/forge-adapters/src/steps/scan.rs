//! Scan de fuentes (Source determinista)
//!
//! - Deriva un índice de clases a partir de las raíces de fuente iniciales.
//! - No accede a IO externo; el índice es una función pura del payload.

use forge_core::{ProducedItem, StepBuilder, StepContext, StepDescriptor, StepRunResult};
use serde_json::json;

use crate::kinds;

/// Consume `source.roots` y produce `class.index`.
pub fn scan_sources() -> StepDescriptor {
    StepBuilder::new("scan-sources").consumes(kinds::SOURCE_ROOTS)
                                    .produces(kinds::CLASS_INDEX)
                                    .action(|ctx: &mut StepContext<'_>| {
                                        let roots = match ctx.single(kinds::SOURCE_ROOTS) {
                                            Some(v) => v.payload.clone(),
                                            None => json!([]),
                                        };
                                        // Índice sintético y estable: una entrada por raíz.
                                        let classes: Vec<_> = roots.as_array()
                                                                   .map(|rs| {
                                                                       rs.iter()
                                                                         .map(|r| json!({ "root": r,
                                                                                          "classes": 3 }))
                                                                         .collect()
                                                                   })
                                                                   .unwrap_or_default();
                                        StepRunResult::success(vec![ProducedItem::new(
                                            kinds::CLASS_INDEX,
                                            json!({ "entries": classes, "schema_version": 1 }),
                                        )])
                                    })
}
