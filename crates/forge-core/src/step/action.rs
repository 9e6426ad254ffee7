//! Interfaz de ejecución de steps y su contexto.

use indexmap::IndexMap;

use super::{ExecutionPhase, StepRunResult};
use crate::context::BuildContext;
use crate::errors::ChainBuildError;
use crate::item::ConsumedInput;
use crate::recorder::{RecordedArg, RecordedHandle, Recorder};

/// Trait que define la acción de un step. Implementaciones deben ser puras
/// respecto a sus inputs + propiedades del contexto.
pub trait StepAction: Send + Sync {
    fn run(&self, ctx: &mut StepContext<'_>) -> StepRunResult;
}

/// Cualquier closure con la firma correcta es una acción.
impl<F> StepAction for F where F: Fn(&mut StepContext<'_>) -> StepRunResult + Send + Sync
{
    fn run(&self, ctx: &mut StepContext<'_>) -> StepRunResult {
        self(ctx)
    }
}

const ABSENT: ConsumedInput = ConsumedInput::Absent;

/// Contexto entregado a `StepAction::run`.
///
/// Materializa los inputs del consumes-set del step y, para fases diferidas,
/// expone el recorder al que se redirigen las llamadas con efectos.
pub struct StepContext<'a> {
    step_id: &'a str,
    phase: ExecutionPhase,
    inputs: IndexMap<String, ConsumedInput>,
    build: &'a BuildContext,
    recorder: Option<&'a Recorder>,
}

impl<'a> StepContext<'a> {
    pub(crate) fn new(step_id: &'a str,
                      phase: ExecutionPhase,
                      inputs: IndexMap<String, ConsumedInput>,
                      build: &'a BuildContext,
                      recorder: Option<&'a Recorder>)
                      -> Self {
        Self { step_id,
               phase,
               inputs,
               build,
               recorder }
    }

    pub fn step_id(&self) -> &str {
        self.step_id
    }

    pub fn phase(&self) -> ExecutionPhase {
        self.phase
    }

    pub fn build(&self) -> &BuildContext {
        self.build
    }

    /// Input materializado para un kind del consumes-set. Kinds no
    /// declarados (o declarados opcionales sin productores) se ven como
    /// `Absent`.
    pub fn input(&self, kind: &str) -> &ConsumedInput {
        self.inputs.get(kind).unwrap_or(&ABSENT)
    }

    /// Instancia única de un kind `Single`, si está presente.
    pub fn single(&self, kind: &str) -> Option<&crate::item::ItemValue> {
        self.input(kind).single()
    }

    /// Colección acumulada de un kind `Multi` (vacía si `Absent`).
    pub fn multi(&self, kind: &str) -> &[crate::item::ItemValue] {
        self.input(kind).multi()
    }

    /// Graba una llamada diferida. Sólo disponible en steps
    /// `StaticInit`/`RuntimeInit`; desde `ProcessingTime` es un error de
    /// build, no un no-op.
    pub fn record(&self, target: &str, args: Vec<RecordedArg>) -> Result<RecordedHandle, ChainBuildError> {
        match self.recorder {
            Some(rec) => rec.record(self.step_id, target, args),
            None => Err(ChainBuildError::RecorderUnavailable { step_id: self.step_id.to_string() }),
        }
    }
}
