use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use autonforge_core::{FieldConfig, FieldSnapshot, PoseTracker, StartInput, Translation, generate};

#[derive(Debug, Clone, PartialEq)]
pub struct PlanRequest {
    pub script: String,
    pub function_name: String,
    pub start: StartInput,
}

#[derive(Debug, Clone)]
pub struct PlanOutput {
    pub translation: Translation,
    pub snapshot: FieldSnapshot,
}

/// Places the robot at the requested start and translates the script.
pub fn run_plan(request: &PlanRequest, field: FieldConfig) -> Result<PlanOutput> {
    field.validate()?;
    let mut tracker = PoseTracker::with_config(field);
    tracker
        .apply_start(request.start)
        .context("invalid start pose")?;
    let translation = generate(&request.script, &request.function_name, &mut tracker)
        .context("code generation failed")?;

    Ok(PlanOutput {
        translation,
        snapshot: tracker.snapshot(),
    })
}

/// Reads the script from `path`, or from stdin when the path is absent or `-`.
pub fn read_script(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display())),
        _ => {
            let mut script = String::new();
            io::stdin()
                .read_to_string(&mut script)
                .context("failed to read script from stdin")?;
            Ok(script)
        }
    }
}
