use autonforge_core::{ObjectColor, PlannerConfig};
#[cfg(target_arch = "wasm32")]
use macroquad::miniquad;
use macroquad::prelude::*;
use macroquad::ui::{hash, root_ui, widgets};

mod field_draw;
pub mod session;

pub use session::{Notice, PlannerSession};

use crate::field_draw::{FieldDrawConfig, draw_field, screen_to_field};

const FIELD_ORIGIN: Vec2 = Vec2::new(20.0, 20.0);
const PANEL_GAP: f32 = 20.0;
const PANEL_WIDTH: f32 = 560.0;
const PANEL_HEIGHT: f32 = 620.0;
const SCRIPT_BOX_HEIGHT: f32 = 170.0;
const OUTPUT_BOX_HEIGHT: f32 = 190.0;
const NOTICE_SIZE: Vec2 = Vec2::new(360.0, 110.0);
const APP_BACKGROUND: Color = Color::from_rgba(0x1E, 0x1E, 0x1E, 255);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UiAction {
    LoadExample,
    Generate,
    Copy,
    ResetField,
    UpdateStart,
    SelectColor(ObjectColor),
    DismissNotice,
}

fn log_ui_action(label: &str) {
    #[cfg(target_arch = "wasm32")]
    miniquad::info!("{}", label);
    #[cfg(not(target_arch = "wasm32"))]
    log::info!("{}", label);
}

pub struct PlannerApp {
    session: PlannerSession,
    field_draw: FieldDrawConfig,
    pending_actions: Vec<UiAction>,
}

impl PlannerApp {
    pub fn new(config: &PlannerConfig) -> Self {
        Self {
            session: PlannerSession::new(config),
            field_draw: FieldDrawConfig::default(),
            pending_actions: Vec::new(),
        }
    }

    fn field_extent(&self) -> f32 {
        self.session.tracker.config().render_extent() as f32
    }

    fn handle_left_click(&mut self) {
        if self.session.notice.is_some() || !is_mouse_button_pressed(MouseButton::Left) {
            return;
        }

        let (mouse_x, mouse_y) = mouse_position();
        let Some(point) = screen_to_field(vec2(mouse_x, mouse_y), FIELD_ORIGIN, self.field_extent())
        else {
            return;
        };
        self.session.place_object(point.x, point.y);
        log_ui_action(&self.session.status);
    }

    fn apply_pending_ui_actions(&mut self) {
        for action in std::mem::take(&mut self.pending_actions) {
            if self.session.notice.is_some() && action != UiAction::DismissNotice {
                log_ui_action(&format!("{action:?} ignored while a notice is open"));
                continue;
            }
            match action {
                UiAction::LoadExample => self.session.load_example(),
                UiAction::Generate => self.session.generate_code(),
                UiAction::Copy => {
                    let text = self.session.copy_output();
                    macroquad::miniquad::window::clipboard_set(&text);
                }
                UiAction::ResetField => self.session.reset_field(),
                UiAction::UpdateStart => self.session.update_start(),
                UiAction::SelectColor(color) => self.session.set_color(color),
                UiAction::DismissNotice => self.session.dismiss_notice(),
            }
            log_ui_action(&format!("{action:?}: {}", self.session.status));
        }
    }

    fn render(&mut self) {
        clear_background(APP_BACKGROUND);
        draw_field(&self.session.tracker, FIELD_ORIGIN, &self.field_draw);
        self.draw_panel();
        self.draw_notice();
    }

    fn draw_panel(&mut self) {
        let position = vec2(FIELD_ORIGIN.x + self.field_extent() + PANEL_GAP, FIELD_ORIGIN.y);
        let box_width = PANEL_WIDTH - 20.0;
        let limit = self.session.tracker.config().start_limit();
        let blocked = self.session.notice.is_some();
        let session = &mut self.session;
        let pending = &mut self.pending_actions;
        let mut queue = |action: UiAction| {
            if !blocked {
                pending.push(action);
            }
        };

        widgets::Window::new(hash!(), position, vec2(PANEL_WIDTH, PANEL_HEIGHT))
            .label("Auton Builder")
            .movable(false)
            .ui(&mut *root_ui(), |ui| {
                ui.input_text(hash!(), "Function Name", &mut session.function_name);
                ui.separator();

                ui.label(None, "Auton Commands");
                widgets::Editbox::new(hash!(), vec2(box_width, SCRIPT_BOX_HEIGHT))
                    .multiline(true)
                    .ui(ui, &mut session.script);

                if ui.button(None, "Load Example") {
                    queue(UiAction::LoadExample);
                }
                ui.same_line(0.0);
                if ui.button(None, "Generate Code") {
                    queue(UiAction::Generate);
                }
                ui.same_line(0.0);
                if ui.button(None, "Copy Code") {
                    queue(UiAction::Copy);
                }
                ui.same_line(0.0);
                if ui.button(None, "Reset Field") {
                    queue(UiAction::ResetField);
                }
                ui.separator();

                ui.label(None, "Generated Code");
                widgets::Editbox::new(hash!(), vec2(box_width, OUTPUT_BOX_HEIGHT))
                    .multiline(true)
                    .ui(ui, &mut session.output);
                ui.separator();

                ui.label(None, "Object Color");
                for (index, color) in ObjectColor::ALL.into_iter().enumerate() {
                    if index > 0 {
                        ui.same_line(0.0);
                    }
                    let label = if color == session.selected_color {
                        format!("[{color}]")
                    } else {
                        color.to_string()
                    };
                    if ui.button(None, label.as_str()) {
                        queue(UiAction::SelectColor(color));
                    }
                }
                ui.separator();

                ui.label(None, "Robot Start Position");
                ui.input_text(hash!(), &format!("X (0-{limit})"), &mut session.start_x);
                ui.input_text(hash!(), &format!("Y (0-{limit})"), &mut session.start_y);
                ui.input_text(hash!(), "Heading (deg)", &mut session.start_heading);
                if ui.button(None, "Update Start") {
                    queue(UiAction::UpdateStart);
                }
                ui.separator();

                ui.label(None, &session.status);
            });
    }

    fn draw_notice(&mut self) {
        let Some(notice) = &self.session.notice else {
            return;
        };
        let title = notice.title();
        let message = notice.message().to_string();
        let position = vec2(
            (screen_width() - NOTICE_SIZE.x) * 0.5,
            (screen_height() - NOTICE_SIZE.y) * 0.5,
        );
        let pending = &mut self.pending_actions;

        widgets::Window::new(hash!(), position, NOTICE_SIZE)
            .label(title)
            .movable(false)
            .ui(&mut *root_ui(), |ui| {
                ui.label(None, &message);
                if ui.button(None, "OK") {
                    pending.push(UiAction::DismissNotice);
                }
            });
    }
}

pub async fn run(config: PlannerConfig) {
    install_panic_hook();
    let mut app = PlannerApp::new(&config);

    loop {
        app.handle_left_click();
        app.render();
        app.apply_pending_ui_actions();

        next_frame().await;
    }
}

#[cfg(target_arch = "wasm32")]
fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let msg = info.to_string();
        if let Some(location) = info.location() {
            miniquad::error!("panic at {}:{}: {}", location.file(), location.line(), msg);
        } else {
            miniquad::error!("panic: {}", msg);
        }
    }));
}

#[cfg(not(target_arch = "wasm32"))]
fn install_panic_hook() {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_notice_blocks_queued_panel_actions() {
        let mut app = PlannerApp::new(&PlannerConfig::default());
        app.session.load_example();
        app.session.notice = Some(Notice::Error("Invalid coordinates! Use X/Y: 0-5.9".to_string()));
        app.pending_actions = vec![
            UiAction::Generate,
            UiAction::ResetField,
            UiAction::DismissNotice,
        ];

        app.apply_pending_ui_actions();
        assert!(app.session.notice.is_none());
        assert!(app.session.output.is_empty());
        assert_eq!(app.session.status, "Example loaded");

        app.pending_actions = vec![UiAction::Generate];
        app.apply_pending_ui_actions();
        assert_eq!(app.session.status, "Code generated successfully");
    }
}
