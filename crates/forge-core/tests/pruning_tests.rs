//! Pruning por alcanzabilidad inversa desde los kinds finales: steps cuyos
//! outputs no alimentan ningún terminal desaparecen del record, con
//! eliminación en cascada y de forma determinista.

use forge_core::{BuildContext, ChainBuilder, ChainEngine, ItemKind, ProducedItem, StepBuilder,
                 StepContext, StepRunResult};
use serde_json::json;

fn produce(kind: &'static str) -> impl Fn(&mut StepContext<'_>) -> StepRunResult + Send + Sync {
    move |_ctx| StepRunResult::success(vec![ProducedItem::new(kind, json!(kind))])
}

/// Escenario de referencia: P1 produce K1, P2 consume K1 y produce K2.
fn two_step_builder() -> ChainBuilder {
    let mut builder = ChainBuilder::new();
    builder.register_kind(ItemKind::single("k1")).unwrap();
    builder.register_kind(ItemKind::single("k2")).unwrap();
    builder.add_step(StepBuilder::new("p1").produces("k1").action(produce("k1")));
    builder.add_step(StepBuilder::new("p2").consumes("k1").produces("k2").action(produce("k2")));
    builder
}

#[test]
fn terminal_k2_keeps_both_steps_in_order() {
    let mut builder = two_step_builder();
    builder.add_final("k2");
    let ctx = BuildContext::new();
    let chain = builder.build(&ctx).unwrap();
    let record = ChainEngine::new().execute(&chain, vec![], &ctx).unwrap();
    assert_eq!(record.order, vec!["p1", "p2"]);
}

#[test]
fn no_terminal_kinds_prunes_everything() {
    let builder = two_step_builder();
    let ctx = BuildContext::new();
    let chain = builder.build(&ctx).unwrap();
    assert!(chain.is_empty());
    assert_eq!(chain.pruned_steps(), &["p1".to_string(), "p2".to_string()]);

    let record = ChainEngine::new().execute(&chain, vec![], &ctx).unwrap();
    assert!(record.order.is_empty());
    assert!(record.outputs.is_empty());
}

#[test]
fn unconsumed_branch_is_pruned_with_cascade() {
    let mut builder = ChainBuilder::new();
    builder.register_kind(ItemKind::single("seed")).unwrap();
    builder.register_kind(ItemKind::single("dead-mid")).unwrap();
    builder.register_kind(ItemKind::single("dead-leaf")).unwrap();
    builder.register_kind(ItemKind::single("app")).unwrap();

    builder.add_step(StepBuilder::new("root").produces("seed").action(produce("seed")));
    builder.add_step(StepBuilder::new("main").consumes("seed").produces("app").action(produce("app")));
    // Rama muerta: feeder alimenta sólo a leaf, y leaf no alcanza "app".
    builder.add_step(StepBuilder::new("feeder").consumes("seed")
                                               .produces("dead-mid")
                                               .action(produce("dead-mid")));
    builder.add_step(StepBuilder::new("leaf").consumes("dead-mid")
                                             .produces("dead-leaf")
                                             .action(produce("dead-leaf")));
    builder.add_final("app");

    let ctx = BuildContext::new();
    let chain = builder.build(&ctx).unwrap();
    let record = ChainEngine::new().execute(&chain, vec![], &ctx).unwrap();

    assert_eq!(record.order, vec!["root", "main"]);
    assert!(!record.executed("feeder"), "feeder feeds only a pruned step");
    assert!(!record.executed("leaf"));
    assert_eq!(chain.pruned_steps(), &["feeder".to_string(), "leaf".to_string()]);
}

#[test]
fn side_effecting_step_survives_pruning() {
    let mut builder = two_step_builder();
    builder.register_kind(ItemKind::marker("metadata.registered")).unwrap();
    builder.add_step(StepBuilder::new("register-metadata").consumes("k1")
                                                          .produces("metadata.registered")
                                                          .side_effect()
                                                          .action(produce("metadata.registered")));
    builder.add_final("k2");

    let ctx = BuildContext::new();
    let chain = builder.build(&ctx).unwrap();
    let record = ChainEngine::new().execute(&chain, vec![], &ctx).unwrap();
    assert!(record.executed("register-metadata"));
}

#[test]
fn weak_produce_does_not_retain_its_step() {
    let mut builder = ChainBuilder::new();
    builder.register_kind(ItemKind::multi("hints")).unwrap();
    builder.register_kind(ItemKind::single("app")).unwrap();

    // El consumidor acepta hints opcionalmente; el productor débil no
    // debe ser arrastrado a la cadena sólo por ese produce.
    builder.add_step(StepBuilder::new("weak-hinter").produces_weak("hints").action(produce("hints")));
    builder.add_step(StepBuilder::new("main").consumes_optional("hints")
                                             .produces("app")
                                             .action(produce("app")));
    builder.add_final("app");

    let ctx = BuildContext::new();
    let chain = builder.build(&ctx).unwrap();
    let record = ChainEngine::new().execute(&chain, vec![], &ctx).unwrap();
    assert_eq!(record.order, vec!["main"]);
    assert_eq!(chain.pruned_steps(), &["weak-hinter".to_string()]);
}

#[test]
fn dot_export_contains_retained_edges_only() {
    let mut builder = two_step_builder();
    builder.add_final("k2");
    let chain = builder.build(&BuildContext::new()).unwrap();
    let dot = chain.to_dot();
    assert!(dot.starts_with("digraph {"));
    assert!(dot.contains("\"p1\" -> \"p2\""));
}
