//! Diagnósticos legibles por humanos.
//!
//! `BuildReport::explain` convierte cualquier error de la taxonomía en una
//! explicación precisa: el camino completo de un ciclo, el consumidor y el
//! kind de un productor faltante junto con los productores desactivados y
//! su razón, ambos productores de un conflicto de multiplicidad. Nunca se
//! filtra un error interno crudo al usuario final: todo pasa por aquí. El
//! formateo para consola/log queda fuera del core; esto es un objeto
//! estructurado convertible a texto plano.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{ChainBuildError, ValidationProblem};

/// Reporte estructurado: un título y una línea por detalle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildReport {
    pub title: String,
    pub details: Vec<String>,
}

impl BuildReport {
    /// Explica un error del motor. Siempre produce un reporte completo,
    /// incluso para errores internos.
    pub fn explain(error: &ChainBuildError) -> BuildReport {
        match error {
            ChainBuildError::DuplicateKind { kind, existing, requested } => BuildReport {
                title: format!("Build item kind '{kind}' declared twice with conflicting multiplicity"),
                details: vec![format!("first declaration: {existing:?}"),
                              format!("conflicting declaration: {requested:?}")],
            },
            ChainBuildError::Invalid { problems } => {
                let mut details = Vec::new();
                for problem in problems {
                    explain_problem(problem, &mut details);
                }
                BuildReport { title: format!("Chain validation failed with {} problem(s)", problems.len()),
                              details }
            }
            ChainBuildError::Cycle { path } => BuildReport {
                title: "Cycle detected among build steps".to_string(),
                details: vec![crate::errors::display_cycle(path)],
            },
            ChainBuildError::StepExecution { step_id, cause } => BuildReport {
                title: format!("Step '{step_id}' failed during execution"),
                details: vec![cause.clone(),
                              "the run was aborted; no partial execution record is usable".to_string()],
            },
            ChainBuildError::NonRecordableArgument { step_id, target, reason } => BuildReport {
                title: format!("Step '{step_id}' recorded a non-recordable argument"),
                details: vec![format!("while recording call to '{target}'"), reason.clone()],
            },
            ChainBuildError::RecorderUnavailable { step_id } => BuildReport {
                title: format!("Step '{step_id}' attempted to record outside a deferred phase"),
                details: vec!["only StaticInit/RuntimeInit steps may record deferred calls".to_string()],
            },
            ChainBuildError::Internal(msg) => BuildReport {
                title: "Internal build error".to_string(),
                details: vec![msg.clone()],
            },
        }
    }

    pub fn to_plain_text(&self) -> String {
        let mut out = self.title.clone();
        for detail in &self.details {
            out.push_str("\n  - ");
            out.push_str(detail);
        }
        out
    }
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_plain_text())
    }
}

fn explain_problem(problem: &ValidationProblem, details: &mut Vec<String>) {
    match problem {
        ValidationProblem::MissingProducer { step_id, kind, inactive_producers } => {
            details.push(format!("step '{step_id}' requires kind '{kind}' but no active step produces it"));
            if inactive_producers.is_empty() {
                details.push(format!("no registered step declares a produce of '{kind}'"));
            }
            for producer in inactive_producers {
                details.push(format!("'{}' would produce '{kind}' but was deactivated: {}",
                                     producer.step_id, producer.reason));
            }
        }
        ValidationProblem::MultipleProducers { kind, producers } => {
            details.push(format!("single kind '{kind}' has {} producers: {}",
                                 producers.len(),
                                 producers.join(", ")));
        }
        ValidationProblem::UndeclaredKind { step_id, kind } => {
            details.push(format!("step '{step_id}' references kind '{kind}' which was never registered"));
        }
        ValidationProblem::InitialItemProduced { step_id, kind } => {
            details.push(format!("kind '{kind}' is an initial resource and cannot be produced by step '{step_id}'"));
        }
        ValidationProblem::NoOutputs { step_id } => {
            details.push(format!("step '{step_id}' produces nothing; flag it side-effecting or remove it"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DeactivatedProducer;

    #[test]
    fn cycle_report_shows_closed_path() {
        let err = ChainBuildError::Cycle { path: vec!["a".into(), "b".into()] };
        let report = BuildReport::explain(&err);
        assert_eq!(report.details, vec!["a -> b -> a".to_string()]);
    }

    #[test]
    fn missing_producer_report_names_inactive_producer_and_reason() {
        let err = ChainBuildError::invalid(ValidationProblem::MissingProducer {
            step_id: "consumer".into(),
            kind: "jdbc.config".into(),
            inactive_producers: vec![DeactivatedProducer {
                step_id: "jdbc-producer".into(),
                reason: "condition 'flag 'jdbc' enabled' evaluated to false".into(),
            }],
        });
        let text = BuildReport::explain(&err).to_plain_text();
        assert!(text.contains("consumer"));
        assert!(text.contains("jdbc.config"));
        assert!(text.contains("jdbc-producer"));
        assert!(text.contains("evaluated to false"));
    }

    #[test]
    fn multiple_producers_report_lists_both() {
        let err = ChainBuildError::invalid(ValidationProblem::MultipleProducers {
            kind: "app.artifact".into(),
            producers: vec!["packager-a".into(), "packager-b".into()],
        });
        let text = BuildReport::explain(&err).to_plain_text();
        assert!(text.contains("packager-a"));
        assert!(text.contains("packager-b"));
    }
}
