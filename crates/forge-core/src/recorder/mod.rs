//! Puente de ejecución diferida (recorder).
//!
//! Los steps `StaticInit`/`RuntimeInit` no ejecutan sus efectos contra un
//! target vivo: cada llamada se captura como una instrucción serializable
//! (operación + argumentos) que el colaborador externo de generación de
//! código reproduce en la fase de arranque correspondiente de la aplicación
//! producida. El orden de emisión preserva el orden topológico de los steps
//! de origen y, dentro de un step, el orden de llamada.

mod instruction;
mod recorder;

pub use instruction::{Instruction, InstructionSeq, RecordedArg, RecordedHandle};
pub use recorder::Recorder;
