//! Captura append-only de instrucciones diferidas.

use std::sync::Mutex;

use super::instruction::{validate_arg, Instruction, InstructionSeq, RecordedArg, RecordedHandle};
use crate::errors::ChainBuildError;

#[derive(Debug, Default)]
struct RecorderInner {
    instructions: Vec<Instruction>,
    next_handle: u64,
}

/// Lista append-only de instrucciones de UNA fase diferida.
///
/// Los appends se serializan con un mutex: varios steps de la misma fase
/// podrían ejecutar concurrentemente y el orden de captura debe ser total.
/// Los handles emitidos sólo son válidos dentro de la misma secuencia.
#[derive(Debug, Default)]
pub struct Recorder {
    inner: Mutex<RecorderInner>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Captura una llamada y devuelve el handle de su resultado.
    ///
    /// Falla con `NonRecordableArgument` si algún argumento referencia un
    /// handle desconocido para esta secuencia (p.ej. emitido por la otra
    /// fase diferida).
    pub fn record(&self,
                  step_id: &str,
                  target: &str,
                  args: Vec<RecordedArg>)
                  -> Result<RecordedHandle, ChainBuildError> {
        let mut inner = self.inner
                            .lock()
                            .map_err(|_| ChainBuildError::Internal("recorder mutex poisoned".into()))?;

        for arg in &args {
            if let Err(reason) = validate_arg(arg, inner.next_handle) {
                return Err(ChainBuildError::NonRecordableArgument { step_id: step_id.to_string(),
                                                                    target: target.to_string(),
                                                                    reason });
            }
        }

        let result = RecordedHandle(inner.next_handle);
        inner.next_handle += 1;
        inner.instructions.push(Instruction { step_id: step_id.to_string(),
                                              target: target.to_string(),
                                              args,
                                              result });
        Ok(result)
    }

    /// Cantidad de instrucciones capturadas hasta ahora.
    pub fn len(&self) -> usize {
        self.inner.lock().map(|i| i.instructions.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Instrucciones capturadas desde la posición `start` (seq del handle +
    /// target), para que el engine las refleje en el event log.
    pub(crate) fn recorded_since(&self, start: usize) -> Vec<(u64, String)> {
        self.inner
            .lock()
            .map(|i| {
                i.instructions[start.min(i.instructions.len())..]
                 .iter()
                 .map(|ins| (ins.result.index(), ins.target.clone()))
                 .collect()
            })
            .unwrap_or_default()
    }

    /// Entrega la secuencia capturada y deja el recorder vacío. El core no
    /// retiene las instrucciones después del handoff.
    pub fn flush(&self) -> InstructionSeq {
        let mut inner = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        InstructionSeq { instructions: std::mem::take(&mut inner.instructions) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_assigns_sequential_handles() {
        let rec = Recorder::new();
        let h0 = rec.record("s1", "registry.add", vec![json!("a").into()]).unwrap();
        let h1 = rec.record("s1", "registry.add", vec![json!("b").into()]).unwrap();
        assert_eq!(h0.index(), 0);
        assert_eq!(h1.index(), 1);
    }

    #[test]
    fn ref_to_earlier_result_is_recordable() {
        let rec = Recorder::new();
        let h0 = rec.record("s1", "factory.create", vec![]).unwrap();
        let h1 = rec.record("s1", "factory.wire", vec![RecordedArg::Ref(h0)]).unwrap();
        let seq = rec.flush();
        assert_eq!(seq.len(), 2);
        assert_eq!(seq.instructions[1].args, vec![RecordedArg::Ref(h0)]);
        assert_eq!(seq.instructions[1].result, h1);
    }

    #[test]
    fn ref_to_unknown_handle_is_rejected() {
        let rec = Recorder::new();
        let err = rec.record("s1", "factory.wire", vec![RecordedArg::Ref(RecordedHandle(7))])
                     .unwrap_err();
        match err {
            ChainBuildError::NonRecordableArgument { step_id, target, .. } => {
                assert_eq!(step_id, "s1");
                assert_eq!(target, "factory.wire");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn flush_drains_the_sequence() {
        let rec = Recorder::new();
        rec.record("s1", "op", vec![]).unwrap();
        assert_eq!(rec.flush().len(), 1);
        assert!(rec.flush().is_empty());
    }
}
