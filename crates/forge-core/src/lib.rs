//! forge-core: orquestador determinista de build steps
pub mod constants;
pub mod context;
pub mod errors;
pub mod event;
pub mod graph;
pub mod hashing;
pub mod item;
pub mod recorder;
pub mod report;
pub mod schedule;
pub mod step;

pub use context::BuildContext;
pub use errors::{ChainBuildError, DeactivatedProducer, ValidationProblem};
pub use event::{ChainEvent, ChainEventKind, EventStore, InMemoryEventStore};
pub use graph::{BuildChain, ChainBuilder, ChainNode};
pub use item::{ConsumedInput, ItemKind, ItemValue, KindRegistry, Multiplicity, ProducedItem};
pub use recorder::{Instruction, InstructionSeq, RecordedArg, RecordedHandle, Recorder};
pub use report::BuildReport;
pub use schedule::{schedule, ChainEngine, ExecutionRecord};
pub use step::{ExecutionPhase, StepAction, StepBuilder, StepCondition, StepContext, StepDescriptor,
               StepRunResult};
