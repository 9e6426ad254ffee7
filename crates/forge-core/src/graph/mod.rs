//! Grafo de dependencias entre steps.
//!
//! A partir de los descriptores registrados, el `ChainBuilder` construye un
//! grafo dirigido (arista productor → consumidor por cada kind compartido,
//! más las aristas de hints explícitos), valida productores faltantes y
//! duplicados acumulando TODOS los problemas, detecta ciclos reportando el
//! camino completo, y poda los steps cuyos outputs no alcanzan ningún kind
//! final. El resultado es una `BuildChain` inmutable lista para agendar.

mod builder;
mod chain;
mod cycle;
mod prune;

pub use builder::ChainBuilder;
pub use chain::{BuildChain, ChainNode};
