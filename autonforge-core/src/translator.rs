use crate::instruction::{ClampState, Instruction, LineError, normalize_line};
use crate::tracker::PoseTracker;
use log::{debug, info, warn};
use thiserror::Error;

const INDENT: &str = "    ";
const HEADER_COMMENT: &str = "// Auto-generated code - Verify before use!";
const GEAR_RATIO_CONSTANT: &str = "constexpr double GEAR_RATIO = 1.0;";
const TICKS_PER_REV_CONSTANT: &str = "constexpr int TICKS_PER_REV = 900;";
const WAIT_STATEMENT: &str = "chassis.pid_wait_quick_chain();";
const INTAKE_POWER: i32 = 110;
const CLAMP_SETTLE_MS: i64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    #[error("please enter a function name")]
    EmptyFunctionName,
    #[error("please enter commands")]
    EmptyScript,
    #[error("invalid function name '{0}': must follow C++ identifier rules")]
    InvalidFunctionName(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    Malformed(LineError),
    UnknownCommand,
    InvalidClampState(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line_number: usize,
    pub line: String,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn comment(&self) -> String {
        match &self.kind {
            DiagnosticKind::Malformed(err) => {
                format!("// Error processing: {} - {}", self.line, err)
            }
            DiagnosticKind::UnknownCommand => format!("// Unknown command: {}", self.line),
            DiagnosticKind::InvalidClampState(state) => {
                format!("// Invalid clamp state: {state}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    pub code: String,
    pub diagnostics: Vec<Diagnostic>,
    pub instructions: usize,
}

impl Translation {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

pub fn validate_function_name(name: &str) -> Result<&str, GenerateError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(GenerateError::EmptyFunctionName);
    }
    if !is_identifier(name) {
        return Err(GenerateError::InvalidFunctionName(name.to_string()));
    }
    Ok(name)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

pub fn generate(
    script: &str,
    function_name: &str,
    tracker: &mut PoseTracker,
) -> Result<Translation, GenerateError> {
    if function_name.trim().is_empty() {
        return Err(GenerateError::EmptyFunctionName);
    }
    if script.trim().is_empty() {
        return Err(GenerateError::EmptyScript);
    }
    let function_name = validate_function_name(function_name)?;

    tracker.reset();

    let mut out = CodeBuffer::new(function_name);
    let mut diagnostics = Vec::new();
    let mut instructions = 0;

    for (index, raw) in script.lines().enumerate() {
        let Some(line) = normalize_line(raw) else {
            continue;
        };
        let line_number = index + 1;

        let kind = match Instruction::parse(&line) {
            Ok(instruction) => {
                debug!("line {line_number}: {instruction:?}");
                let kind = emit(&instruction, tracker, &mut out);
                if kind.is_none() {
                    instructions += 1;
                }
                kind
            }
            Err(err) => Some(DiagnosticKind::Malformed(err)),
        };

        if let Some(kind) = kind {
            let diagnostic = Diagnostic {
                line_number,
                line,
                kind,
            };
            let comment = diagnostic.comment();
            warn!("line {line_number}: {comment}");
            out.statement(comment);
            diagnostics.push(diagnostic);
        }
    }

    info!(
        "generated {function_name}: {instructions} instructions, {} diagnostics",
        diagnostics.len()
    );

    Ok(Translation {
        code: out.finish(),
        diagnostics,
        instructions,
    })
}

fn emit(
    instruction: &Instruction,
    tracker: &mut PoseTracker,
    out: &mut CodeBuffer,
) -> Option<DiagnosticKind> {
    match instruction {
        Instruction::Drive {
            distance, speed, ..
        } => {
            out.statement(format!(
                "chassis.pid_drive_set({}, {speed}, true);",
                format_float(*distance)
            ));
            out.statement(WAIT_STATEMENT);
            tracker.apply_motion(*distance, 0.0);
        }
        Instruction::Turn { angle, speed, .. } => {
            let absolute = tracker.heading() + angle;
            out.statement(format!(
                "chassis.pid_turn_set({}, {speed}, true);",
                format_fixed(absolute, 2)
            ));
            out.statement(WAIT_STATEMENT);
            tracker.apply_motion(0.0, *angle);
        }
        // Duration and speed are validated but the rollers always run at a fixed power.
        Instruction::Intake { .. } => {
            out.statement(format!("intake_top.move({INTAKE_POWER});"));
            out.statement(format!("intake_bottom.move({INTAKE_POWER});"));
        }
        Instruction::Clamp(ClampState::Open) => clamp(out, false),
        Instruction::Clamp(ClampState::Close) => clamp(out, true),
        Instruction::Clamp(ClampState::Unknown(state)) => {
            return Some(DiagnosticKind::InvalidClampState(state.clone()));
        }
        Instruction::Delay { duration } => {
            out.statement(format!("pros::delay({duration});"));
        }
        Instruction::Unrecognized(_) => return Some(DiagnosticKind::UnknownCommand),
    }
    None
}

fn clamp(out: &mut CodeBuffer, engaged: bool) {
    out.statement(format!("pros::delay({CLAMP_SETTLE_MS});"));
    out.statement(format!("clamp1.set({engaged});"));
}

struct CodeBuffer {
    lines: Vec<String>,
}

impl CodeBuffer {
    fn new(function_name: &str) -> Self {
        let mut buffer = Self {
            lines: vec![format!("void {function_name}() {{")],
        };
        buffer.statement(HEADER_COMMENT);
        buffer.statement(GEAR_RATIO_CONSTANT);
        buffer.statement(TICKS_PER_REV_CONSTANT);
        buffer.lines.push(String::new());
        buffer
    }

    fn statement(&mut self, text: impl AsRef<str>) {
        self.lines.push(format!("{INDENT}{}", text.as_ref()));
    }

    fn finish(mut self) -> String {
        self.lines.push("}".to_string());
        self.lines.join("\n")
    }
}

/// Shortest round-trip decimal with a `.0` on whole numbers and a signed,
/// two digit exponent (`24.0`, `0.25`, `1e+16`, `1.5e-05`).
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let text = format!("{value:?}");
    match text.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => text,
    }
}

fn format_fixed(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    format!("{value:.precision$}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinates::RenderPoint;
    use crate::example::{EXAMPLE_FUNCTION_NAME, EXAMPLE_SCRIPT};
    use crate::field::ObjectColor;
    use approx::assert_relative_eq;

    const HEADER: &str = "void auton() {
    // Auto-generated code - Verify before use!
    constexpr double GEAR_RATIO = 1.0;
    constexpr int TICKS_PER_REV = 900;
";

    fn body(code: &str) -> Vec<&str> {
        let lines: Vec<&str> = code.lines().collect();
        assert_eq!(lines.last(), Some(&"}"));
        lines[5..lines.len() - 1].to_vec()
    }

    #[test]
    fn translates_example_script() {
        let mut tracker = PoseTracker::new();
        let translation = generate(EXAMPLE_SCRIPT, EXAMPLE_FUNCTION_NAME, &mut tracker).unwrap();

        let expected = "void example_auton() {
    // Auto-generated code - Verify before use!
    constexpr double GEAR_RATIO = 1.0;
    constexpr int TICKS_PER_REV = 900;

    chassis.pid_drive_set(24.0, 110, true);
    chassis.pid_wait_quick_chain();
    chassis.pid_turn_set(90.00, 90, true);
    chassis.pid_wait_quick_chain();
    intake_top.move(110);
    intake_bottom.move(110);
    pros::delay(500);
    pros::delay(1000);
    clamp1.set(false);
}";
        assert_eq!(translation.code, expected);
        assert!(translation.is_clean());
        assert_eq!(translation.instructions, 5);

        let path = tracker.path();
        assert_eq!(path.len(), 3);
        assert_eq!(path[0], RenderPoint::new(240.0, 240.0));
        assert_relative_eq!(path[1].x, 320.0, epsilon = 1e-9);
        assert_relative_eq!(path[1].y, 240.0, epsilon = 1e-9);
        assert_eq!(path[2], path[1]);
        assert_eq!(tracker.heading(), 90.0);
    }

    #[test]
    fn header_is_emitted_before_commands() {
        let mut tracker = PoseTracker::new();
        let translation = generate("delay 5", "auton", &mut tracker).unwrap();
        assert!(translation.code.starts_with(HEADER));
        assert!(translation.code.ends_with("    pros::delay(5);\n}"));
    }

    #[test]
    fn turns_emit_accumulated_absolute_heading() {
        let mut tracker = PoseTracker::new();
        tracker.set_start(1.0, 1.0, 10.0).unwrap();
        let translation = generate("TURN 45 90\nTURN -100.5 80", "auton", &mut tracker).unwrap();

        assert_eq!(
            body(&translation.code),
            vec![
                "    chassis.pid_turn_set(55.00, 90, true);",
                "    chassis.pid_wait_quick_chain();",
                "    chassis.pid_turn_set(-45.50, 80, true);",
                "    chassis.pid_wait_quick_chain();",
            ]
        );
        assert_eq!(tracker.heading(), -45.5);
    }

    #[test]
    fn drive_does_not_change_heading_for_later_turns() {
        let mut tracker = PoseTracker::new();
        let translation = generate(
            "TURN 30 90\nDRIVE 48 100\nDRIVE -12 100\nTURN 30 90",
            "auton",
            &mut tracker,
        )
        .unwrap();

        let lines = body(&translation.code);
        assert_eq!(lines[0], "    chassis.pid_turn_set(30.00, 90, true);");
        assert_eq!(lines[2], "    chassis.pid_drive_set(48.0, 100, true);");
        assert_eq!(lines[4], "    chassis.pid_drive_set(-12.0, 100, true);");
        assert_eq!(lines[6], "    chassis.pid_turn_set(60.00, 90, true);");
    }

    #[test]
    fn heading_is_never_wrapped() {
        let mut tracker = PoseTracker::new();
        let script = "TURN 270 90\nTURN 180 90";
        let translation = generate(script, "auton", &mut tracker).unwrap();
        assert!(
            translation
                .code
                .contains("chassis.pid_turn_set(450.00, 90, true);")
        );
        assert_eq!(tracker.heading(), 450.0);
    }

    #[test]
    fn malformed_line_yields_single_comment_and_keeps_pose() {
        let mut tracker = PoseTracker::new();
        let translation = generate("DRIVE abc", "auton", &mut tracker).unwrap();

        assert_eq!(
            body(&translation.code),
            vec!["    // Error processing: DRIVE ABC - could not convert distance 'ABC' to a number"]
        );
        assert_eq!(translation.diagnostics.len(), 1);
        assert_eq!(translation.diagnostics[0].line_number, 1);
        assert_eq!(translation.instructions, 0);
        assert_eq!(tracker.pose(), tracker.start().pose());
        assert_eq!(tracker.path().len(), 1);
    }

    #[test]
    fn invalid_clamp_state_emits_only_a_comment() {
        let mut tracker = PoseTracker::new();
        let translation = generate("CLAMP sideways", "auton", &mut tracker).unwrap();

        assert_eq!(
            body(&translation.code),
            vec!["    // Invalid clamp state: sideways"]
        );
        assert_eq!(
            translation.diagnostics[0].kind,
            DiagnosticKind::InvalidClampState("sideways".to_string())
        );
    }

    #[test]
    fn clamp_close_engages_actuator() {
        let mut tracker = PoseTracker::new();
        let translation = generate("clamp close", "auton", &mut tracker).unwrap();
        assert_eq!(
            body(&translation.code),
            vec!["    pros::delay(1000);", "    clamp1.set(true);"]
        );
    }

    #[test]
    fn diagnostics_keep_their_place_and_blank_lines_vanish() {
        let mut tracker = PoseTracker::new();
        let script = "\n  delay 10\n\n   \nspin 3\nINTAKE 100\nDELAY 20\n";
        let translation = generate(script, "auton", &mut tracker).unwrap();

        assert_eq!(
            body(&translation.code),
            vec![
                "    pros::delay(10);",
                "    // Unknown command: SPIN 3",
                "    // Error processing: INTAKE 100 - missing speed argument",
                "    pros::delay(20);",
            ]
        );
        let numbers: Vec<usize> = translation
            .diagnostics
            .iter()
            .map(|d| d.line_number)
            .collect();
        assert_eq!(numbers, vec![5, 6]);
    }

    #[test]
    fn intake_arguments_do_not_reach_output() {
        let mut tracker = PoseTracker::new();
        let a = generate("INTAKE 1000 127", "auton", &mut tracker).unwrap();
        let b = generate("INTAKE 5 -20", "auton", &mut tracker).unwrap();
        assert_eq!(a.code, b.code);
    }

    #[test]
    fn repeated_generation_is_identical_and_resets_tracker() {
        let mut tracker = PoseTracker::new();
        tracker.set_start(0.5, 5.0, -90.0).unwrap();
        tracker.place_object(100.0, 100.0, ObjectColor::Red);
        let script = "DRIVE 30 100\nTURN 45 90\nDRIVE 12.5 80 2\nBOGUS";

        let first = generate(script, "auton", &mut tracker).unwrap();
        let path_after_first = tracker.path().to_vec();
        let second = generate(script, "auton", &mut tracker).unwrap();

        assert_eq!(first, second);
        assert_eq!(tracker.path(), path_after_first.as_slice());
        assert_eq!(tracker.path().len(), 4);
        assert!(tracker.objects().is_empty());
        assert!(second.code.contains("chassis.pid_turn_set(-45.00, 90, true);"));
    }

    #[test]
    fn run_level_errors_abort_before_any_line() {
        let mut tracker = PoseTracker::new();
        tracker.apply_motion(24.0, 10.0);

        assert_eq!(
            generate("DRIVE 1 2", "  ", &mut tracker),
            Err(GenerateError::EmptyFunctionName)
        );
        assert_eq!(
            generate(" \n\t", "auton", &mut tracker),
            Err(GenerateError::EmptyScript)
        );
        assert_eq!(
            generate("", "", &mut tracker),
            Err(GenerateError::EmptyFunctionName)
        );
        assert_eq!(
            generate("DRIVE 1 2", "9lives", &mut tracker),
            Err(GenerateError::InvalidFunctionName("9lives".to_string()))
        );
        assert_eq!(tracker.path().len(), 2);
        assert_eq!(tracker.heading(), 10.0);
    }

    #[test]
    fn validates_identifiers() {
        assert_eq!(validate_function_name(" _skills2 "), Ok("_skills2"));
        assert!(validate_function_name("left side").is_err());
        assert!(validate_function_name("auton-1").is_err());
        assert!(validate_function_name("1st").is_err());
        assert!(validate_function_name("").is_err());
    }

    #[test]
    fn floats_print_like_the_templates_expect() {
        assert_eq!(format_float(24.0), "24.0");
        assert_eq!(format_float(-12.5), "-12.5");
        assert_eq!(format_float(0.1), "0.1");
        assert_eq!(format_float(1e16), "1e+16");
        assert_eq!(format_float(1.5e-5), "1.5e-05");
        assert_eq!(format_float(f64::INFINITY), "inf");
        assert_eq!(format_float(f64::NAN), "nan");
        assert_eq!(format_fixed(90.0, 2), "90.00");
        assert_eq!(format_fixed(-0.004, 2), "-0.00");
    }
}
