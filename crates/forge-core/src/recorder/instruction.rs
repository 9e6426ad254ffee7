//! Instrucciones diferidas serializables.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Referencia opaca al resultado de una instrucción previamente grabada en
/// la misma secuencia. Permite encadenar llamadas sin materializar valores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordedHandle(pub(crate) u64);

impl RecordedHandle {
    pub fn index(self) -> u64 {
        self.0
    }
}

/// Argumento de una instrucción: un subconjunto serializable conocido.
/// Cualquier otra cosa es `NonRecordableArgument` en tiempo de build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RecordedArg {
    /// Valor JSON-representable (primitivos, listas, objetos declarados).
    Value(Value),
    /// Referencia al resultado de una instrucción anterior de la misma
    /// secuencia.
    Ref(RecordedHandle),
}

impl RecordedArg {
    /// Serializa un valor arbitrario a argumento grabable. La falla de
    /// serialización (claves no-string, floats no finitos, tipos opacos) se
    /// reporta al llamador para que el engine la convierta en
    /// `NonRecordableArgument` del step en curso.
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self, String> {
        serde_json::to_value(value).map(RecordedArg::Value)
                                   .map_err(|e| e.to_string())
    }
}

impl From<Value> for RecordedArg {
    fn from(value: Value) -> Self {
        RecordedArg::Value(value)
    }
}

impl From<RecordedHandle> for RecordedArg {
    fn from(handle: RecordedHandle) -> Self {
        RecordedArg::Ref(handle)
    }
}

/// Una llamada capturada: target de la operación, argumentos y el handle
/// asignado a su resultado.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    pub step_id: String,
    pub target: String,
    pub args: Vec<RecordedArg>,
    pub result: RecordedHandle,
}

/// Secuencia ordenada de instrucciones de una fase diferida, lista para
/// entregarse al colaborador de generación de código. El core no la retiene
/// después del handoff.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstructionSeq {
    pub instructions: Vec<Instruction>,
}

impl InstructionSeq {
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instruction> {
        self.instructions.iter()
    }
}

/// Valida que un argumento sea grabable dentro de una secuencia cuyo último
/// handle emitido es `next_handle` (exclusivo).
pub(crate) fn validate_arg(arg: &RecordedArg, next_handle: u64) -> Result<(), String> {
    match arg {
        RecordedArg::Value(_) => Ok(()),
        RecordedArg::Ref(handle) if handle.0 < next_handle => Ok(()),
        RecordedArg::Ref(handle) => {
            Err(format!("reference to unknown recorded result #{}", handle.0))
        }
    }
}
