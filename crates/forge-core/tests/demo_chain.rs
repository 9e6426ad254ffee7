//! Pipeline completo con los steps de forge-adapters:
//! scan → generate (x2) → register-beans (StaticInit) → assemble.

use forge_adapters::{kinds, steps};
use forge_core::{BuildContext, ChainBuilder, ChainEngine, ProducedItem};
use serde_json::json;

fn demo_builder() -> ChainBuilder {
    let mut builder = ChainBuilder::new();
    kinds::register(&mut builder).unwrap();
    steps::install_demo_steps(&mut builder);
    builder
}

#[test]
fn demo_chain_produces_the_app_artifact() {
    let ctx = BuildContext::new();
    let chain = demo_builder().build(&ctx).unwrap();
    assert!(chain.pruned_steps().is_empty());

    let initial = vec![ProducedItem::new(kinds::SOURCE_ROOTS, json!(["src/main"]))];
    let record = ChainEngine::new().execute(&chain, initial, &ctx).unwrap();

    assert_eq!(record.order.last().map(String::as_str), Some("assemble-artifact"));
    let artifact = &record.output(kinds::APP_ARTIFACT)[0];
    assert_eq!(artifact.payload["config_frozen"], json!(true));
    // config-accessors primero: prioridad 10 sobre el generador REST.
    assert_eq!(artifact.payload["generated_units"],
               json!(["config-accessors", "rest-endpoints"]));
    // La fase estática grabó el registro de beans en vez de ejecutarlo.
    assert!(!record.static_init.is_empty());
}

#[test]
fn demo_chain_is_deterministic_across_runs() {
    let ctx = BuildContext::new();
    let initial = || vec![ProducedItem::new(kinds::SOURCE_ROOTS, json!(["src/main"]))];

    let chain_a = demo_builder().build(&ctx).unwrap();
    let chain_b = demo_builder().build(&ctx).unwrap();
    assert_eq!(chain_a.definition_hash(), chain_b.definition_hash());

    let first = ChainEngine::new().execute(&chain_a, initial(), &ctx).unwrap();
    let second = ChainEngine::new().execute(&chain_b, initial(), &ctx).unwrap();
    assert_eq!(first.order, second.order);
    assert_eq!(first.chain_fingerprint, second.chain_fingerprint);
}
