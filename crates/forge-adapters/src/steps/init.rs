//! Step diferido: registra beans en la fase estática vía el recorder.

use forge_core::{ExecutionPhase, ProducedItem, StepBuilder, StepContext, StepDescriptor,
                 StepRunResult};
use serde_json::json;

use crate::kinds;

/// Consume los `bean.definitions` acumulados y graba las llamadas de
/// registro en lugar de ejecutarlas. Produce el marcador `config.frozen`.
pub fn register_beans() -> StepDescriptor {
    StepBuilder::new("register-beans")
        .consumes(kinds::BEAN_DEFINITIONS)
        .produces(kinds::CONFIG_FROZEN)
        .phase(ExecutionPhase::StaticInit)
        .action(|ctx: &mut StepContext<'_>| {
            let registry = match ctx.record("beanRegistry.new", vec![]) {
                Ok(h) => h,
                Err(e) => return StepRunResult::failure(e),
            };
            for definition in ctx.multi(kinds::BEAN_DEFINITIONS) {
                if let Err(e) = ctx.record("beanRegistry.register",
                                           vec![registry.into(), definition.payload.clone().into()])
                {
                    return StepRunResult::failure(e);
                }
            }
            if let Err(e) = ctx.record("beanRegistry.freeze", vec![registry.into()]) {
                return StepRunResult::failure(e);
            }
            StepRunResult::success(vec![ProducedItem::marker(kinds::CONFIG_FROZEN)])
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_core::{BuildContext, ChainBuilder, ChainEngine};

    #[test]
    fn register_beans_records_one_call_per_definition() {
        let mut builder = ChainBuilder::new();
        crate::kinds::register(&mut builder).unwrap();
        crate::steps::install_demo_steps(&mut builder);
        builder.add_final(kinds::CONFIG_FROZEN);

        let ctx = BuildContext::new();
        let chain = builder.build(&ctx).unwrap();
        let initial = vec![ProducedItem::new(kinds::SOURCE_ROOTS, json!(["src/main"]))];
        let record = ChainEngine::new().execute(&chain, initial, &ctx).unwrap();

        // new + un register (solo REST aporta beans) + freeze.
        let targets: Vec<&str> = record.static_init.iter().map(|i| i.target.as_str()).collect();
        assert_eq!(targets, vec!["beanRegistry.new", "beanRegistry.register", "beanRegistry.freeze"]);
    }
}
