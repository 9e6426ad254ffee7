//! main-forge: demostración end-to-end del orquestador.
//!
//! Arma la cadena sintética de forge-adapters, la valida, la ejecuta con un
//! valor inicial y muestra el grafo, los eventos y las instrucciones
//! diferidas capturadas.

use forge_adapters::{kinds, steps};
use forge_core::{BuildContext, BuildReport, ChainBuilder, ChainEngine, ProducedItem};
use serde_json::json;

fn main() {
    let mut builder = ChainBuilder::new();
    if let Err(e) = kinds::register(&mut builder) {
        eprintln!("{}", BuildReport::explain(&e));
        std::process::exit(1);
    }
    steps::install_demo_steps(&mut builder);

    let mut ctx = BuildContext::new();
    ctx.set_property("app.name", json!("demo-app"));

    let chain = match builder.build(&ctx) {
        Ok(chain) => chain,
        Err(e) => {
            eprintln!("{}", BuildReport::explain(&e));
            std::process::exit(1);
        }
    };

    println!("== Chain ({} steps, {} pruned) ==", chain.len(), chain.pruned_steps().len());
    println!("{}", chain.to_dot());

    let initial = vec![ProducedItem::new(kinds::SOURCE_ROOTS, json!(["src/main", "src/generated"]))];
    let mut engine = ChainEngine::new();
    let record = match engine.execute(&chain, initial, &ctx) {
        Ok(record) => record,
        Err(e) => {
            eprintln!("{}", BuildReport::explain(&e));
            std::process::exit(1);
        }
    };

    println!("== Run {} ==", record.run_id);
    println!("order: {:?}", record.order);
    println!("chain fingerprint: {}", record.chain_fingerprint);
    for value in record.output(kinds::APP_ARTIFACT) {
        println!("artifact [{}]: {}", value.hash, value.payload);
    }

    if !record.static_init.is_empty() {
        println!("== StaticInit instructions ==");
        for ins in record.static_init.iter() {
            println!("  #{} {} <- {} args", ins.result.index(), ins.target, ins.args.len());
        }
    }
    if !record.runtime_init.is_empty() {
        println!("== RuntimeInit instructions ==");
        for ins in record.runtime_init.iter() {
            println!("  #{} {} <- {} args", ins.result.index(), ins.target, ins.args.len());
        }
    }

    println!("== Events ==");
    for event in engine.events() {
        println!("  [{}] {:?}", event.seq, event.kind);
    }
}
