//! Construcción y validación de la cadena.
//!
//! Orden de fases (cada una pura sobre el input inmutable):
//! 1. Filtrar steps activos según su condición (los inactivos se recuerdan
//!    con su razón, para diagnósticos).
//! 2. Indexar productores por kind y validar: kinds no registrados,
//!    multiplicidad `Single` con más de un productor, kinds iniciales
//!    producidos, consumos requeridos sin productor, steps sin outputs ni
//!    flag side-effect. TODOS los problemas se acumulan en una pasada.
//! 3. Materializar aristas productor→consumidor y aristas de hints.
//! 4. Detectar ciclos (DFS con coloreo) reportando el camino ordenado.
//! 5. Podar por alcanzabilidad inversa desde los kinds finales.

use indexmap::{IndexMap, IndexSet};
use serde_json::json;

use super::chain::{BuildChain, ChainNode};
use super::cycle::find_cycle;
use super::prune::retained_steps;
use crate::context::BuildContext;
use crate::errors::{ChainBuildError, DeactivatedProducer, ValidationProblem};
use crate::hashing::hash_value;
use crate::item::{ItemKind, KindRegistry, Multiplicity};
use crate::step::{OrderHint, StepDescriptor};

/// Acumula kinds, steps y declaraciones initial/final; `build` produce la
/// `BuildChain` validada. El orden de registro de steps no afecta la validez
/// del grafo; sólo participa como último criterio de desempate documentado
/// del scheduler.
#[derive(Default)]
pub struct ChainBuilder {
    registry: KindRegistry,
    steps: Vec<StepDescriptor>,
    initial_kinds: IndexSet<String>,
    final_kinds: IndexSet<String>,
}

impl ChainBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra un kind en el catálogo. Idempotente para la misma
    /// declaración; conflicto de multiplicidad es fatal aquí mismo, antes
    /// de cualquier construcción de grafo.
    pub fn register_kind(&mut self, kind: ItemKind) -> Result<&mut Self, ChainBuildError> {
        self.registry.register(kind)?;
        Ok(self)
    }

    /// Registra un step. Llamado una vez por build por cada extensión.
    pub fn add_step(&mut self, step: StepDescriptor) -> &mut Self {
        self.steps.push(step);
        self
    }

    /// Declara un kind inicial: su valor lo aporta el llamador al comenzar
    /// la ejecución. Ningún step puede producir un kind inicial `Single`.
    pub fn add_initial(&mut self, kind: impl Into<String>) -> &mut Self {
        self.initial_kinds.insert(kind.into());
        self
    }

    /// Declara un kind final (terminal): el pruning conserva exactamente lo
    /// necesario para producirlo.
    pub fn add_final(&mut self, kind: impl Into<String>) -> &mut Self {
        self.final_kinds.insert(kind.into());
        self
    }

    pub fn registry(&self) -> &KindRegistry {
        &self.registry
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Construye la cadena validada y podada.
    pub fn build(&self, ctx: &BuildContext) -> Result<BuildChain, ChainBuildError> {
        // Fase 1: activación.
        let mut active: Vec<usize> = Vec::new();
        let mut inactive: Vec<usize> = Vec::new();
        for (idx, step) in self.steps.iter().enumerate() {
            if step.is_active(ctx) {
                active.push(idx);
            } else {
                inactive.push(idx);
            }
        }
        let active_steps: Vec<&StepDescriptor> = active.iter().map(|&i| &self.steps[i]).collect();

        // Fase 2: índice de productores + validación acumulativa.
        let mut producers: IndexMap<String, Vec<usize>> = IndexMap::new();
        for (ai, step) in active_steps.iter().enumerate() {
            for produce in step.produces() {
                producers.entry(produce.kind.clone()).or_default().push(ai);
            }
        }

        let mut problems: Vec<ValidationProblem> = Vec::new();
        self.check_registered_kinds(&active_steps, &mut problems);
        self.check_multiplicity(&active_steps, &producers, &mut problems);
        self.check_initial_produced(&active_steps, &producers, &mut problems);
        self.check_missing_producers(&active_steps, &inactive, &producers, &mut problems);
        for step in &active_steps {
            if step.produces().is_empty() && !step.is_side_effect() {
                problems.push(ValidationProblem::NoOutputs { step_id: step.id().to_string() });
            }
        }
        if !problems.is_empty() {
            return Err(ChainBuildError::Invalid { problems });
        }

        // Fase 3: aristas de consumo + hints explícitos.
        let n = active_steps.len();
        let mut deps: Vec<IndexSet<usize>> = vec![IndexSet::new(); n];
        let mut dependents: Vec<IndexSet<usize>> = vec![IndexSet::new(); n];
        let id_to_active: IndexMap<&str, usize> = active_steps.iter()
                                                              .enumerate()
                                                              .map(|(ai, s)| (s.id(), ai))
                                                              .collect();
        for (ai, step) in active_steps.iter().enumerate() {
            for consume in step.consumes() {
                for &p in producers.get(&consume.kind).map(Vec::as_slice).unwrap_or(&[]) {
                    deps[ai].insert(p);
                    dependents[p].insert(ai);
                }
            }
            for hint in step.order_hints() {
                // Hints hacia ids desconocidos se ignoran: permiten ordenar
                // contra steps presentes sólo en algunas configuraciones.
                match hint {
                    OrderHint::Before(other) => {
                        if let Some(&o) = id_to_active.get(other.as_str()) {
                            deps[o].insert(ai);
                            dependents[ai].insert(o);
                        }
                    }
                    OrderHint::After(other) => {
                        if let Some(&o) = id_to_active.get(other.as_str()) {
                            deps[ai].insert(o);
                            dependents[o].insert(ai);
                        }
                    }
                }
            }
        }

        // Fase 4: ciclos, sobre el grafo completo previo al pruning.
        if let Some(cycle) = find_cycle(&dependents) {
            let path = cycle.into_iter()
                            .map(|ai| active_steps[ai].id().to_string())
                            .collect();
            return Err(ChainBuildError::Cycle { path });
        }

        // Fase 5: pruning por demanda desde los kinds finales.
        let retained = retained_steps(&active_steps, &producers, &self.final_kinds);
        let pruned: Vec<String> = (0..n).filter(|ai| !retained.contains(ai))
                                        .map(|ai| active_steps[ai].id().to_string())
                                        .collect();

        let remap: IndexMap<usize, usize> = retained.iter()
                                                    .enumerate()
                                                    .map(|(new, &old)| (old, new))
                                                    .collect();
        let mut nodes: Vec<ChainNode> = Vec::with_capacity(retained.len());
        for &ai in &retained {
            let mut node_deps: Vec<usize> =
                deps[ai].iter().filter_map(|d| remap.get(d).copied()).collect();
            let mut node_dependents: Vec<usize> =
                dependents[ai].iter().filter_map(|d| remap.get(d).copied()).collect();
            node_deps.sort_unstable();
            node_dependents.sort_unstable();
            nodes.push(ChainNode { descriptor: active_steps[ai].clone(),
                                   declaration_index: active[ai],
                                   deps: node_deps,
                                   dependents: node_dependents });
        }

        let definition_hash = self.definition_hash(&nodes);
        Ok(BuildChain { nodes,
                        registry: self.registry.clone(),
                        initial_kinds: self.initial_kinds.clone(),
                        final_kinds: self.final_kinds.clone(),
                        definition_hash,
                        pruned })
    }

    fn check_registered_kinds(&self, active: &[&StepDescriptor], problems: &mut Vec<ValidationProblem>) {
        for step in active {
            for kind in step.consumes()
                            .iter()
                            .map(|c| c.kind.as_str())
                            .chain(step.produces().iter().map(|p| p.kind.as_str()))
            {
                if !self.registry.contains(kind) {
                    problems.push(ValidationProblem::UndeclaredKind { step_id: step.id().to_string(),
                                                                     kind: kind.to_string() });
                }
            }
        }
        for kind in self.initial_kinds.iter().chain(self.final_kinds.iter()) {
            if !self.registry.contains(kind) {
                problems.push(ValidationProblem::UndeclaredKind { step_id: "<chain>".to_string(),
                                                                 kind: kind.clone() });
            }
        }
    }

    fn check_multiplicity(&self,
                          active: &[&StepDescriptor],
                          producers: &IndexMap<String, Vec<usize>>,
                          problems: &mut Vec<ValidationProblem>) {
        for (kind, prods) in producers {
            if self.registry.multiplicity_of(kind) == Some(Multiplicity::Single) && prods.len() > 1 {
                problems.push(ValidationProblem::MultipleProducers {
                    kind: kind.clone(),
                    producers: prods.iter().map(|&ai| active[ai].id().to_string()).collect(),
                });
            }
        }
    }

    fn check_initial_produced(&self,
                              active: &[&StepDescriptor],
                              producers: &IndexMap<String, Vec<usize>>,
                              problems: &mut Vec<ValidationProblem>) {
        for kind in &self.initial_kinds {
            if self.registry.multiplicity_of(kind) != Some(Multiplicity::Single) {
                continue;
            }
            for &ai in producers.get(kind).map(Vec::as_slice).unwrap_or(&[]) {
                problems.push(ValidationProblem::InitialItemProduced {
                    step_id: active[ai].id().to_string(),
                    kind: kind.clone(),
                });
            }
        }
    }

    fn check_missing_producers(&self,
                               active: &[&StepDescriptor],
                               inactive: &[usize],
                               producers: &IndexMap<String, Vec<usize>>,
                               problems: &mut Vec<ValidationProblem>) {
        for step in active {
            for consume in step.consumes() {
                if consume.optional || self.initial_kinds.contains(&consume.kind) {
                    continue;
                }
                if producers.get(&consume.kind).map(Vec::is_empty).unwrap_or(true) {
                    // El "por qué" importa más que el "qué": nombrar a los
                    // productores declarados pero desactivados y su razón.
                    let inactive_producers: Vec<DeactivatedProducer> =
                        inactive.iter()
                                .map(|&i| &self.steps[i])
                                .filter(|s| s.declares_produce(&consume.kind))
                                .map(|s| DeactivatedProducer {
                                    step_id: s.id().to_string(),
                                    reason: s.deactivation_reason()
                                             .unwrap_or_else(|| "deactivated".to_string()),
                                })
                                .collect();
                    problems.push(ValidationProblem::MissingProducer { step_id: step.id().to_string(),
                                                                      kind: consume.kind.clone(),
                                                                      inactive_producers });
                }
            }
        }
    }

    fn definition_hash(&self, nodes: &[ChainNode]) -> String {
        let ids: Vec<&str> = nodes.iter().map(|n| n.id()).collect();
        let finals: Vec<&String> = self.final_kinds.iter().collect();
        hash_value(&json!({
            "engine_version": crate::constants::ENGINE_VERSION,
            "steps": ids,
            "final_kinds": finals,
        }))
    }
}
