use std::fs;
use std::path::{Path, PathBuf};

use a_gen_auton::plan::{PlanRequest, read_script, run_plan};
use anyhow::{Context, Result, bail};
use autonforge_core::{EXAMPLE_FUNCTION_NAME, EXAMPLE_SCRIPT, PlannerConfig, StartInput};
use clap::Parser;
use log::info;

/// Translate an autonomous command script into chassis code.
#[derive(Debug, Parser)]
#[command(name = "a-gen-auton", version, about, long_about = None)]
struct Cli {
    /// Command script to translate; reads stdin when omitted or `-`.
    #[arg(value_name = "SCRIPT", conflicts_with = "example")]
    script: Option<PathBuf>,

    /// Translate the bundled example script instead of reading one.
    #[arg(long)]
    example: bool,

    /// Name of the generated function.
    #[arg(short = 'n', long = "name", value_name = "IDENT")]
    function_name: Option<String>,

    /// Planner config (JSON) with field geometry, default name and start.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Start x in grid cells (0-5.9).
    #[arg(long, value_name = "X", allow_negative_numbers = true)]
    start_x: Option<f64>,

    /// Start y in grid cells (0-5.9), up is positive.
    #[arg(long, value_name = "Y", allow_negative_numbers = true)]
    start_y: Option<f64>,

    /// Start heading in degrees.
    #[arg(long, value_name = "DEG", allow_negative_numbers = true)]
    heading: Option<f64>,

    /// Write the generated code here instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Write the simulated field (start, pose, path, objects) as JSON.
    #[arg(long, value_name = "FILE")]
    snapshot: Option<PathBuf>,

    /// Render the simulated path to a PNG.
    #[cfg(feature = "preview")]
    #[arg(long, value_name = "FILE")]
    preview: Option<PathBuf>,

    /// Exit with an error when any line was emitted as a diagnostic.
    #[arg(long)]
    deny_diagnostics: bool,

    /// Increase log output (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn request(&self, config: &PlannerConfig) -> Result<PlanRequest> {
        let script = if self.example {
            EXAMPLE_SCRIPT.to_string()
        } else {
            read_script(self.script.as_deref())?
        };

        let function_name = match (&self.function_name, self.example) {
            (Some(name), _) => name.clone(),
            (None, true) => EXAMPLE_FUNCTION_NAME.to_string(),
            (None, false) => config.function_name.clone(),
        };

        let start = StartInput {
            x: self.start_x.unwrap_or(config.start.x),
            y: self.start_y.unwrap_or(config.start.y),
            heading: self.heading.unwrap_or(config.start.heading),
        };

        Ok(PlanRequest {
            script,
            function_name,
            start,
        })
    }
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

#[cfg(feature = "preview")]
fn write_preview(
    cli: &Cli,
    snapshot: &autonforge_core::FieldSnapshot,
    config: &PlannerConfig,
) -> Result<()> {
    let Some(path) = &cli.preview else {
        return Ok(());
    };
    let image = a_gen_auton::preview::render_preview(
        snapshot,
        &config.field,
        &autonforge_core::RobotFootprint::default(),
    );
    image
        .save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => PlannerConfig::load(path)?,
        None => PlannerConfig::default(),
    };
    let request = cli.request(&config)?;
    info!(
        "translating {} line(s) into {}",
        request.script.lines().count(),
        request.function_name
    );

    let output = run_plan(&request, config.field)?;
    let translation = &output.translation;

    match &cli.output {
        Some(path) => write_file(path, format!("{}\n", translation.code).as_bytes())?,
        None => println!("{}", translation.code),
    }

    if let Some(path) = &cli.snapshot {
        let json = output
            .snapshot
            .to_json_pretty()
            .context("failed to serialize field snapshot")?;
        write_file(path, json.as_bytes())?;
    }

    #[cfg(feature = "preview")]
    write_preview(&cli, &output.snapshot, &config)?;

    if cli.deny_diagnostics && !translation.is_clean() {
        bail!(
            "{} line(s) could not be translated",
            translation.diagnostics.len()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn example_flag_uses_bundled_script_and_name() {
        let cli = Cli::try_parse_from(["a-gen-auton", "--example", "--start-y", "1.5"]).unwrap();
        let request = cli.request(&PlannerConfig::default()).unwrap();

        assert_eq!(request.script, EXAMPLE_SCRIPT);
        assert_eq!(request.function_name, EXAMPLE_FUNCTION_NAME);
        assert_eq!(
            request.start,
            StartInput {
                x: 3.0,
                y: 1.5,
                heading: 0.0,
            }
        );
    }

    #[test]
    fn flags_override_config_values() {
        let config = PlannerConfig {
            function_name: "from_config".to_string(),
            ..PlannerConfig::default()
        };
        let cli = Cli::try_parse_from([
            "a-gen-auton",
            "--example",
            "-n",
            "skills_run",
            "--heading",
            "-90",
        ])
        .unwrap();
        let request = cli.request(&config).unwrap();

        assert_eq!(request.function_name, "skills_run");
        assert_eq!(request.start.heading, -90.0);
    }

    #[test]
    fn script_and_example_conflict() {
        assert!(Cli::try_parse_from(["a-gen-auton", "plan.txt", "--example"]).is_err());
    }
}
