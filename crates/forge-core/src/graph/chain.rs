//! La cadena validada: grafo inmutable de steps admitidos.

use indexmap::IndexSet;

use crate::item::KindRegistry;
use crate::step::StepDescriptor;

/// Nodo del grafo final. Los índices de `deps`/`dependents` refieren a la
/// posición dentro de `BuildChain::nodes`.
#[derive(Debug, Clone)]
pub struct ChainNode {
    pub(crate) descriptor: StepDescriptor,
    /// Posición de registro original; último criterio de desempate del
    /// scheduler.
    pub(crate) declaration_index: usize,
    pub(crate) deps: Vec<usize>,
    pub(crate) dependents: Vec<usize>,
}

impl ChainNode {
    pub fn descriptor(&self) -> &StepDescriptor {
        &self.descriptor
    }

    pub fn id(&self) -> &str {
        self.descriptor.id()
    }

    pub fn declaration_index(&self) -> usize {
        self.declaration_index
    }

    pub fn deps(&self) -> &[usize] {
        &self.deps
    }

    pub fn dependents(&self) -> &[usize] {
        &self.dependents
    }
}

/// Resultado de `ChainBuilder::build`: acíclica, validada y podada.
/// Reconstruida fresca en cada invocación de build; nunca se persiste.
#[derive(Debug, Clone)]
pub struct BuildChain {
    pub(crate) nodes: Vec<ChainNode>,
    pub(crate) registry: KindRegistry,
    pub(crate) initial_kinds: IndexSet<String>,
    pub(crate) final_kinds: IndexSet<String>,
    pub(crate) definition_hash: String,
    /// Steps activos eliminados por el pruning (para eventos/diagnóstico).
    pub(crate) pruned: Vec<String>,
}

impl BuildChain {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[ChainNode] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> &ChainNode {
        &self.nodes[index]
    }

    pub fn registry(&self) -> &KindRegistry {
        &self.registry
    }

    pub fn initial_kinds(&self) -> impl Iterator<Item = &str> {
        self.initial_kinds.iter().map(|s| s.as_str())
    }

    pub fn final_kinds(&self) -> impl Iterator<Item = &str> {
        self.final_kinds.iter().map(|s| s.as_str())
    }

    pub fn is_final_kind(&self, kind: &str) -> bool {
        self.final_kinds.contains(kind)
    }

    pub fn definition_hash(&self) -> &str {
        &self.definition_hash
    }

    /// Ids de los steps activos que el pruning eliminó.
    pub fn pruned_steps(&self) -> &[String] {
        &self.pruned
    }

    pub fn find(&self, step_id: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.id() == step_id)
    }

    /// Volcado DOT del grafo final, para depuración. String puro: el core
    /// no posee ningún formato en disco.
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph {\n    node [shape=rectangle];\n    rankdir=LR;\n\n");
        for node in &self.nodes {
            for &dep in &node.deps {
                out.push_str(&format!("    {} -> {}\n",
                                      quote(self.nodes[dep].id()),
                                      quote(node.id())));
            }
        }
        out.push_str("}\n");
        out
    }
}

fn quote(id: &str) -> String {
    format!("\"{}\"", id.replace('"', "\\\""))
}
