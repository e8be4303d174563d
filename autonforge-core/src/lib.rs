pub mod config;
pub mod coordinates;
pub mod example;
pub mod field;
pub mod footprint;
pub mod instruction;
pub mod pose;
pub mod snapshot;
pub mod tracker;
pub mod translator;

pub use config::{ConfigError, FieldConfig, PlannerConfig, StartInput};
pub use coordinates::{GridPoint, RenderPoint};
pub use example::{EXAMPLE_FUNCTION_NAME, EXAMPLE_SCRIPT};
pub use field::{FieldObject, ObjectColor, ParseColorError};
pub use footprint::{OBJECT_RADIUS, RobotFootprint, START_MARKER_RADIUS, START_MARKER_RGB};
pub use instruction::{ClampState, Instruction, LineError};
pub use pose::{Pose, StartConfig};
pub use snapshot::FieldSnapshot;
pub use tracker::{FieldError, PoseTracker};
pub use translator::{
    Diagnostic, DiagnosticKind, GenerateError, Translation, generate, validate_function_name,
};
