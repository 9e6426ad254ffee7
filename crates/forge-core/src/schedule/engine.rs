//! Core ChainEngine implementation
//!
//! Motor de ejecución de cadenas deterministas. Responsable de recorrer el
//! orden topológico, materializar los inputs de cada step, depositar sus
//! outputs, liberar valores cuando su último consumidor terminó y capturar
//! las fases diferidas en el recorder. Primer error fatal aborta el run
//! completo: no hay record parcial.

use indexmap::IndexMap;
use serde_json::json;
use uuid::Uuid;

use super::record::ExecutionRecord;
use super::scheduler::schedule;
use crate::context::BuildContext;
use crate::errors::ChainBuildError;
use crate::event::{ChainEventKind, EventStore, InMemoryEventStore};
use crate::graph::BuildChain;
use crate::hashing::hash_value;
use crate::item::{ConsumedInput, ItemValue, Multiplicity, ProducedItem};
use crate::recorder::Recorder;
use crate::step::{ExecutionPhase, StepContext, StepRunResult};

#[derive(Debug)]
pub struct ChainEngine<E: EventStore> {
    event_store: E,
    last_run_id: Option<Uuid>,
}

impl ChainEngine<InMemoryEventStore> {
    /// Engine con store de eventos en memoria.
    pub fn new() -> Self {
        Self::with_store(InMemoryEventStore::default())
    }
}

impl Default for ChainEngine<InMemoryEventStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EventStore> ChainEngine<E> {
    pub fn with_store(event_store: E) -> Self {
        Self { event_store,
               last_run_id: None }
    }

    pub fn event_store(&self) -> &E {
        &self.event_store
    }

    pub fn last_run_id(&self) -> Option<Uuid> {
        self.last_run_id
    }

    /// Eventos del último run ejecutado.
    pub fn events(&self) -> Vec<crate::event::ChainEvent> {
        self.last_run_id.map(|id| self.event_store.list(id)).unwrap_or_default()
    }

    /// Ejecuta la cadena completa. `initial` aporta los valores de los
    /// kinds declarados iniciales; el resto de los valores los producen los
    /// steps.
    pub fn execute(&mut self,
                   chain: &BuildChain,
                   initial: Vec<ProducedItem>,
                   ctx: &BuildContext)
                   -> Result<ExecutionRecord, ChainBuildError> {
        let run_id = Uuid::new_v4();
        self.last_run_id = Some(run_id);

        let order = schedule(chain);
        self.event_store.append_kind(run_id,
                                     ChainEventKind::ChainValidated {
                                         definition_hash: chain.definition_hash().to_string(),
                                         step_count: chain.len(),
                                         pruned: chain.pruned_steps().to_vec(),
                                     });

        let mut run = RunState::new(chain, initial)?;
        let static_recorder = Recorder::new();
        let runtime_recorder = Recorder::new();

        let mut executed_ids: Vec<String> = Vec::with_capacity(order.len());
        let mut step_fingerprints: Vec<String> = Vec::with_capacity(order.len());

        for (position, &node_idx) in order.iter().enumerate() {
            let node = chain.node(node_idx);
            let step = node.descriptor();
            let step_id = step.id().to_string();

            self.event_store.append_kind(run_id,
                                         ChainEventKind::StepStarted { step_index: position,
                                                                       step_id: step_id.clone() });

            let inputs = run.materialize_inputs(step)?;
            let recorder = match step.phase() {
                ExecutionPhase::ProcessingTime => None,
                ExecutionPhase::StaticInit => Some(&static_recorder),
                ExecutionPhase::RuntimeInit => Some(&runtime_recorder),
            };
            let recorded_before = recorder.map(|r| r.len()).unwrap_or(0);

            let mut step_ctx = StepContext::new(step.id(), step.phase(), inputs, ctx, recorder);
            let result = step.action().run(&mut step_ctx);

            match result {
                StepRunResult::Success { outputs } => {
                    let output_hashes = run.deposit_outputs(step, outputs)?;

                    if let Some(rec) = recorder {
                        for (seq, target) in rec.recorded_since(recorded_before) {
                            self.event_store.append_kind(run_id,
                                                         ChainEventKind::InstructionRecorded {
                                                             step_id: step_id.clone(),
                                                             target,
                                                             seq,
                                                         });
                        }
                    }

                    let fingerprint = hash_value(&json!({
                        "engine_version": crate::constants::ENGINE_VERSION,
                        "definition_hash": chain.definition_hash(),
                        "step_index": position,
                        "step_id": step_id,
                        "output_hashes": output_hashes,
                    }));
                    self.event_store.append_kind(run_id,
                                                 ChainEventKind::StepFinished {
                                                     step_index: position,
                                                     step_id: step_id.clone(),
                                                     outputs: output_hashes,
                                                     fingerprint: fingerprint.clone(),
                                                 });
                    step_fingerprints.push(fingerprint);
                    executed_ids.push(step_id);
                    run.release_consumed(step);
                }
                StepRunResult::Failure { error } => {
                    // Errores del recorder conservan su variante propia; el
                    // resto se reporta como fallo del step.
                    let error = match error {
                        e @ ChainBuildError::NonRecordableArgument { .. } => e,
                        e @ ChainBuildError::RecorderUnavailable { .. } => e,
                        other => ChainBuildError::StepExecution { step_id: step_id.clone(),
                                                                  cause: other.to_string() },
                    };
                    self.event_store.append_kind(run_id,
                                                 ChainEventKind::StepFailed {
                                                     step_index: position,
                                                     step_id,
                                                     error: error.clone(),
                                                 });
                    return Err(error);
                }
            }
        }

        let chain_fingerprint = hash_value(&json!({
            "engine_version": crate::constants::ENGINE_VERSION,
            "definition_hash": chain.definition_hash(),
            "step_fingerprints": step_fingerprints,
        }));
        self.event_store
            .append_kind(run_id,
                         ChainEventKind::ChainCompleted { chain_fingerprint: chain_fingerprint.clone() });

        Ok(ExecutionRecord { run_id,
                             order: executed_ids,
                             outputs: run.into_final_outputs(),
                             step_fingerprints,
                             chain_fingerprint,
                             static_init: static_recorder.flush(),
                             runtime_init: runtime_recorder.flush() })
    }
}

/// Estado con alcance de run: tabla de valores por kind y contadores de
/// consumidores pendientes para liberar memoria en grafos grandes.
struct RunState<'c> {
    chain: &'c BuildChain,
    values: IndexMap<String, Vec<ItemValue>>,
    remaining_consumers: IndexMap<String, usize>,
}

impl<'c> RunState<'c> {
    fn new(chain: &'c BuildChain, initial: Vec<ProducedItem>) -> Result<Self, ChainBuildError> {
        let mut remaining_consumers: IndexMap<String, usize> = IndexMap::new();
        for node in chain.nodes() {
            let mut seen: Vec<&str> = Vec::new();
            for consume in node.descriptor().consumes() {
                if !seen.contains(&consume.kind.as_str()) {
                    seen.push(&consume.kind);
                    *remaining_consumers.entry(consume.kind.clone()).or_insert(0) += 1;
                }
            }
        }

        let mut state = Self { chain,
                               values: IndexMap::new(),
                               remaining_consumers };

        for item in initial {
            if !chain.initial_kinds().any(|k| k == item.kind) {
                return Err(ChainBuildError::Internal(format!(
                    "initial value provided for kind '{}' not declared initial", item.kind
                )));
            }
            if chain.registry().multiplicity_of(&item.kind) == Some(Multiplicity::Single)
               && state.values.contains_key(&item.kind)
            {
                return Err(ChainBuildError::Internal(format!(
                    "multiple initial values for single kind '{}'", item.kind
                )));
            }
            let kind = item.kind.clone();
            state.values.entry(kind).or_default().push(item.into_value());
        }
        Ok(state)
    }

    /// Materializa el protocolo de entrada del step: instancia única para
    /// `Single`, colección completa para `Multi`, `Marker` para `Empty`
    /// presentes y `Absent` explícito para opcionales sin productores.
    fn materialize_inputs(&self,
                          step: &crate::step::StepDescriptor)
                          -> Result<IndexMap<String, ConsumedInput>, ChainBuildError> {
        let mut inputs = IndexMap::new();
        for consume in step.consumes() {
            let multiplicity = self.chain
                                   .registry()
                                   .multiplicity_of(&consume.kind)
                                   .ok_or_else(|| ChainBuildError::Internal(format!(
                                       "kind '{}' missing from registry after validation", consume.kind
                                   )))?;
            let present = self.values.get(&consume.kind);
            let input = match (multiplicity, present) {
                (Multiplicity::Single, Some(vals)) if !vals.is_empty() => {
                    ConsumedInput::Single(vals[0].clone())
                }
                (Multiplicity::Multi, Some(vals)) => ConsumedInput::Multi(vals.clone()),
                (Multiplicity::Empty, Some(_)) => ConsumedInput::Marker,
                _ if consume.optional => ConsumedInput::Absent,
                (Multiplicity::Multi, None) => ConsumedInput::Multi(Vec::new()),
                _ => {
                    // Productor presente en validación pero sin valor
                    // depositado (p.ej. produce débil podado).
                    return Err(ChainBuildError::StepExecution {
                        step_id: step.id().to_string(),
                        cause: format!("required kind '{}' was never produced", consume.kind),
                    });
                }
            };
            inputs.insert(consume.kind.clone(), input);
        }
        Ok(inputs)
    }

    /// Deposita los outputs de un step, validando el contrato declarado, y
    /// devuelve los hashes en orden de emisión.
    fn deposit_outputs(&mut self,
                       step: &crate::step::StepDescriptor,
                       outputs: Vec<ProducedItem>)
                       -> Result<Vec<String>, ChainBuildError> {
        let mut hashes = Vec::with_capacity(outputs.len());
        for item in outputs {
            if !step.declares_produce(&item.kind) {
                return Err(ChainBuildError::StepExecution {
                    step_id: step.id().to_string(),
                    cause: format!("produced undeclared kind '{}'", item.kind),
                });
            }
            let multiplicity = self.chain.registry().multiplicity_of(&item.kind);
            if multiplicity == Some(Multiplicity::Single)
               && self.values.get(&item.kind).map(|v| !v.is_empty()).unwrap_or(false)
            {
                return Err(ChainBuildError::StepExecution {
                    step_id: step.id().to_string(),
                    cause: format!("single kind '{}' produced more than once", item.kind),
                });
            }
            let kind = item.kind.clone();
            let value = item.into_value();
            hashes.push(value.hash.clone());
            self.values.entry(kind).or_default().push(value);
        }
        Ok(hashes)
    }

    /// Libera los valores cuyo último consumidor acaba de ejecutar, salvo
    /// los kinds finales (outputs del build).
    fn release_consumed(&mut self, step: &crate::step::StepDescriptor) {
        let mut seen: Vec<&str> = Vec::new();
        for consume in step.consumes() {
            if seen.contains(&consume.kind.as_str()) {
                continue;
            }
            seen.push(&consume.kind);
            if let Some(count) = self.remaining_consumers.get_mut(&consume.kind) {
                *count = count.saturating_sub(1);
                if *count == 0 && !self.chain.is_final_kind(&consume.kind) {
                    self.values.shift_remove(&consume.kind);
                }
            }
        }
    }

    fn into_final_outputs(self) -> IndexMap<String, Vec<ItemValue>> {
        let mut outputs = IndexMap::new();
        for kind in self.chain.final_kinds() {
            if let Some(vals) = self.values.get(kind) {
                outputs.insert(kind.to_string(), vals.clone());
            }
        }
        outputs
    }
}
