use autonforge_core::{
    EXAMPLE_FUNCTION_NAME, EXAMPLE_SCRIPT, GenerateError, ObjectColor, PlannerConfig, PoseTracker,
    generate,
};
use log::warn;

/// Blocking message shown over the planner until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Error(String),
    Warning(String),
    Info(String),
}

impl Notice {
    pub fn title(&self) -> &'static str {
        match self {
            Notice::Error(_) => "Error",
            Notice::Warning(_) => "Warning",
            Notice::Info(_) => "Copied",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Notice::Error(message) | Notice::Warning(message) | Notice::Info(message) => message,
        }
    }
}

/// Editor state behind the planner window. Holds no rendering handles so the
/// actions can run headless.
#[derive(Debug, Clone)]
pub struct PlannerSession {
    pub tracker: PoseTracker,
    pub script: String,
    pub function_name: String,
    pub start_x: String,
    pub start_y: String,
    pub start_heading: String,
    pub selected_color: ObjectColor,
    pub output: String,
    pub status: String,
    pub notice: Option<Notice>,
}

impl PlannerSession {
    pub fn new(config: &PlannerConfig) -> Self {
        let (tracker, notice) = match PoseTracker::from_planner(config) {
            Ok(tracker) => (tracker, None),
            Err(err) => {
                warn!("ignoring configured start: {err}");
                (
                    PoseTracker::with_config(config.field),
                    Some(Notice::Error(err.to_string())),
                )
            }
        };

        Self {
            tracker,
            script: String::new(),
            function_name: config.function_name.clone(),
            start_x: config.start.x.to_string(),
            start_y: config.start.y.to_string(),
            start_heading: config.start.heading.to_string(),
            selected_color: ObjectColor::default(),
            output: String::new(),
            status: "Ready".to_string(),
            notice,
        }
    }

    pub fn load_example(&mut self) {
        self.script = EXAMPLE_SCRIPT.to_string();
        self.function_name = EXAMPLE_FUNCTION_NAME.to_string();
        self.status = "Example loaded".to_string();
    }

    pub fn generate_code(&mut self) {
        match generate(&self.script, &self.function_name, &mut self.tracker) {
            Ok(translation) => {
                self.output = translation.code;
                self.status = if translation.diagnostics.is_empty() {
                    "Code generated successfully".to_string()
                } else {
                    format!(
                        "Code generated with {} diagnostic(s)",
                        translation.diagnostics.len()
                    )
                };
            }
            Err(GenerateError::EmptyFunctionName) => {
                self.notice = Some(Notice::Warning("Please enter a function name!".to_string()));
            }
            Err(GenerateError::EmptyScript) => {
                self.notice = Some(Notice::Warning("Please enter commands!".to_string()));
            }
            Err(err) => {
                self.notice = Some(Notice::Error(err.to_string()));
                self.status = "Generation failed".to_string();
            }
        }
    }

    pub fn update_start(&mut self) {
        let parsed = (
            self.start_x.trim().parse::<f64>(),
            self.start_y.trim().parse::<f64>(),
            self.start_heading.trim().parse::<f64>(),
        );
        let applied = match parsed {
            (Ok(x), Ok(y), Ok(heading)) => self.tracker.set_start(x, y, heading).is_ok(),
            _ => false,
        };

        if applied {
            self.status = "Start position updated".to_string();
        } else {
            let limit = self.tracker.config().start_limit();
            self.notice = Some(Notice::Error(format!(
                "Invalid coordinates! Use X/Y: 0-{limit}"
            )));
        }
    }

    pub fn set_color(&mut self, color: ObjectColor) {
        self.selected_color = color;
    }

    pub fn place_object(&mut self, x_pixels: f64, y_pixels: f64) {
        let color = self.selected_color;
        self.tracker.place_object(x_pixels, y_pixels, color);
        self.status = format!("Placed {color} object");
    }

    pub fn reset_field(&mut self) {
        self.tracker.reset();
        self.status = "Field reset".to_string();
    }

    /// Text handed to the clipboard sink.
    pub fn copy_output(&mut self) -> String {
        self.status = "Code copied to clipboard".to_string();
        self.notice = Some(Notice::Info("Code copied to clipboard!".to_string()));
        self.output.clone()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }
}

impl Default for PlannerSession {
    fn default() -> Self {
        Self::new(&PlannerConfig::default())
    }
}
