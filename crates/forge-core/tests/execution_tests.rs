//! Ejecución end-to-end: materialización de inputs Single/Multi/Marker,
//! valores iniciales, liberación de intermedios y abortos por fallo.

use forge_core::{BuildContext, ChainBuildError, ChainBuilder, ChainEngine, ChainEventKind,
                 ItemKind, ProducedItem, StepBuilder, StepContext, StepRunResult};
use serde_json::json;

fn produce(kind: &'static str) -> impl Fn(&mut StepContext<'_>) -> StepRunResult + Send + Sync {
    move |_ctx| StepRunResult::success(vec![ProducedItem::new(kind, json!(kind))])
}

#[test]
fn multi_consumer_sees_every_contribution() {
    let mut builder = ChainBuilder::new();
    builder.register_kind(ItemKind::multi("feature")).unwrap();
    builder.register_kind(ItemKind::single("manifest")).unwrap();

    for name in ["alpha", "beta", "gamma"] {
        builder.add_step(StepBuilder::new(name).produces("feature").action(
            move |_ctx: &mut StepContext<'_>| {
                StepRunResult::success(vec![ProducedItem::new("feature", json!(name))])
            },
        ));
    }
    builder.add_step(StepBuilder::new("manifest-writer").consumes("feature")
                                                        .produces("manifest")
                                                        .action(|ctx: &mut StepContext<'_>| {
                                                            let names: Vec<_> =
                                                                ctx.multi("feature")
                                                                   .iter()
                                                                   .map(|v| v.payload.clone())
                                                                   .collect();
                                                            StepRunResult::success(vec![
                                                                ProducedItem::new("manifest", json!(names)),
                                                            ])
                                                        }));
    builder.add_final("manifest");

    let ctx = BuildContext::new();
    let chain = builder.build(&ctx).unwrap();
    let record = ChainEngine::new().execute(&chain, vec![], &ctx).unwrap();

    let manifest = &record.output("manifest")[0];
    // Los tres aportes llegan, en orden de ejecución (== declaración aquí).
    assert_eq!(manifest.payload, json!(["alpha", "beta", "gamma"]));
}

#[test]
fn optional_input_without_producer_materializes_absent() {
    let mut builder = ChainBuilder::new();
    builder.register_kind(ItemKind::single("tuning")).unwrap();
    builder.register_kind(ItemKind::single("out")).unwrap();
    builder.add_step(StepBuilder::new("main").consumes_optional("tuning")
                                             .produces("out")
                                             .action(|ctx: &mut StepContext<'_>| {
                                                 assert!(ctx.input("tuning").is_absent());
                                                 assert!(ctx.single("tuning").is_none());
                                                 StepRunResult::success(vec![ProducedItem::new(
                                                     "out",
                                                     json!("defaults"),
                                                 )])
                                             }));
    builder.add_final("out");

    let ctx = BuildContext::new();
    let chain = builder.build(&ctx).unwrap();
    let record = ChainEngine::new().execute(&chain, vec![], &ctx).unwrap();
    assert_eq!(record.output("out")[0].payload, json!("defaults"));
}

#[test]
fn initial_values_are_visible_to_consumers() {
    let mut builder = ChainBuilder::new();
    builder.register_kind(ItemKind::single("classpath")).unwrap();
    builder.register_kind(ItemKind::single("index")).unwrap();
    builder.add_initial("classpath");
    builder.add_step(StepBuilder::new("indexer").consumes("classpath")
                                                .produces("index")
                                                .action(|ctx: &mut StepContext<'_>| {
                                                    let cp = ctx.single("classpath").expect("initial value");
                                                    StepRunResult::success(vec![ProducedItem::new(
                                                        "index",
                                                        json!({ "from": cp.payload.clone() }),
                                                    )])
                                                }));
    builder.add_final("index");

    let ctx = BuildContext::new();
    let chain = builder.build(&ctx).unwrap();
    let initial = vec![ProducedItem::new("classpath", json!(["app.jar", "lib.jar"]))];
    let record = ChainEngine::new().execute(&chain, initial, &ctx).unwrap();
    assert_eq!(record.output("index")[0].payload, json!({ "from": ["app.jar", "lib.jar"] }));
}

#[test]
fn initial_value_for_undeclared_kind_is_rejected() {
    let mut builder = ChainBuilder::new();
    builder.register_kind(ItemKind::single("out")).unwrap();
    builder.add_step(StepBuilder::new("s").produces("out").action(produce("out")));
    builder.add_final("out");

    let ctx = BuildContext::new();
    let chain = builder.build(&ctx).unwrap();
    let err = ChainEngine::new().execute(&chain, vec![ProducedItem::new("out", json!(1))], &ctx)
                                .unwrap_err();
    assert!(matches!(err, ChainBuildError::Internal(_)));
}

#[test]
fn marker_kinds_carry_presence_not_payload() {
    let mut builder = ChainBuilder::new();
    builder.register_kind(ItemKind::marker("native.enabled")).unwrap();
    builder.register_kind(ItemKind::single("out")).unwrap();
    builder.add_step(StepBuilder::new("enable-native").produces("native.enabled")
                                                      .action(|_ctx: &mut StepContext<'_>| {
                                                          StepRunResult::success(vec![
                                                              ProducedItem::marker("native.enabled"),
                                                          ])
                                                      }));
    builder.add_step(StepBuilder::new("image-builder").consumes("native.enabled")
                                                      .produces("out")
                                                      .action(|ctx: &mut StepContext<'_>| {
                                                          assert!(!ctx.input("native.enabled").is_absent());
                                                          assert!(ctx.single("native.enabled").is_none());
                                                          StepRunResult::success(vec![ProducedItem::new(
                                                              "out",
                                                              json!("native-image"),
                                                          )])
                                                      }));
    builder.add_final("out");

    let ctx = BuildContext::new();
    let chain = builder.build(&ctx).unwrap();
    assert!(ChainEngine::new().execute(&chain, vec![], &ctx).is_ok());
}

#[test]
fn record_keeps_final_outputs_only() {
    let mut builder = ChainBuilder::new();
    builder.register_kind(ItemKind::single("intermediate")).unwrap();
    builder.register_kind(ItemKind::single("app")).unwrap();
    builder.add_step(StepBuilder::new("a").produces("intermediate").action(produce("intermediate")));
    builder.add_step(StepBuilder::new("b").consumes("intermediate")
                                          .produces("app")
                                          .action(produce("app")));
    builder.add_final("app");

    let ctx = BuildContext::new();
    let chain = builder.build(&ctx).unwrap();
    let record = ChainEngine::new().execute(&chain, vec![], &ctx).unwrap();

    assert_eq!(record.outputs.keys().collect::<Vec<_>>(), vec!["app"]);
    assert!(record.output("intermediate").is_empty());
}

#[test]
fn failing_step_aborts_the_run_with_event() {
    let mut builder = ChainBuilder::new();
    builder.register_kind(ItemKind::single("a")).unwrap();
    builder.register_kind(ItemKind::single("b")).unwrap();
    builder.add_step(StepBuilder::new("ok").produces("a").action(produce("a")));
    builder.add_step(StepBuilder::new("boom").consumes("a")
                                             .produces("b")
                                             .action(|_ctx: &mut StepContext<'_>| {
                                                 StepRunResult::failure(ChainBuildError::Internal(
                                                     "disk full".into(),
                                                 ))
                                             }));
    builder.add_final("b");

    let ctx = BuildContext::new();
    let chain = builder.build(&ctx).unwrap();
    let mut engine = ChainEngine::new();
    let err = engine.execute(&chain, vec![], &ctx).unwrap_err();

    match err {
        ChainBuildError::StepExecution { step_id, cause } => {
            assert_eq!(step_id, "boom");
            assert!(cause.contains("disk full"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    let events = engine.events();
    assert!(events.iter().any(|e| matches!(&e.kind,
                                           ChainEventKind::StepFailed { step_id, .. } if step_id == "boom")));
    assert!(!events.iter().any(|e| matches!(e.kind, ChainEventKind::ChainCompleted { .. })));
}

#[test]
fn producing_an_undeclared_kind_is_an_execution_error() {
    let mut builder = ChainBuilder::new();
    builder.register_kind(ItemKind::single("declared")).unwrap();
    builder.register_kind(ItemKind::single("smuggled")).unwrap();
    builder.add_step(StepBuilder::new("sneaky").produces("declared")
                                               .action(|_ctx: &mut StepContext<'_>| {
                                                   StepRunResult::success(vec![ProducedItem::new(
                                                       "smuggled",
                                                       json!(1),
                                                   )])
                                               }));
    builder.add_final("declared");

    let ctx = BuildContext::new();
    let chain = builder.build(&ctx).unwrap();
    let err = ChainEngine::new().execute(&chain, vec![], &ctx).unwrap_err();
    assert!(matches!(err,
                     ChainBuildError::StepExecution { ref step_id, ref cause }
                         if step_id == "sneaky" && cause.contains("smuggled")));
}

#[test]
fn event_log_tells_the_full_story_in_order() {
    let mut builder = ChainBuilder::new();
    builder.register_kind(ItemKind::single("out")).unwrap();
    builder.add_step(StepBuilder::new("only").produces("out").action(produce("out")));
    builder.add_final("out");

    let ctx = BuildContext::new();
    let chain = builder.build(&ctx).unwrap();
    let mut engine = ChainEngine::new();
    engine.execute(&chain, vec![], &ctx).unwrap();

    let kinds: Vec<&str> = engine.events()
                                 .iter()
                                 .map(|e| match &e.kind {
                                     ChainEventKind::ChainValidated { .. } => "validated",
                                     ChainEventKind::StepStarted { .. } => "started",
                                     ChainEventKind::StepFinished { .. } => "finished",
                                     ChainEventKind::StepFailed { .. } => "failed",
                                     ChainEventKind::InstructionRecorded { .. } => "recorded",
                                     ChainEventKind::ChainCompleted { .. } => "completed",
                                 })
                                 .collect();
    assert_eq!(kinds, vec!["validated", "started", "finished", "completed"]);
}
