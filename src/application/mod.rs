//! Application services (use cases).
//!
//! These services orchestrate domain logic and the solver port to
//! implement lineup generation.

pub mod generator;
pub mod model;
pub mod projection;
pub mod settings;
pub mod validate;

pub use generator::{
    AttemptOutcome, AttemptStatus, AttemptSummary, BatchContext, BatchReport, CancelFlag,
    EntityUsage, LineupGenerator,
};
pub use model::{ConstraintModelBuilder, LineupModel, SelectionVar};
pub use projection::{EffectiveProjections, ProjectionAdjuster};
pub use settings::{BatchSettings, ConstraintToggles, StackRule, DEFAULT_FADE_DAMPENING};
pub use validate::{validate_batch, validate_settings};
