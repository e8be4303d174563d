use autonforge_core::PlannerConfig;
use macroquad::prelude::*;

#[cfg(not(target_arch = "wasm32"))]
const CONFIG_ENV: &str = "AUTONFORGE_CONFIG";

fn window_conf() -> Conf {
    Conf {
        window_title: "AutoGen PRO - Field Designer".to_owned(),
        window_width: 1100,
        window_height: 660,
        ..Default::default()
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn load_config() -> PlannerConfig {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match std::env::var(CONFIG_ENV) {
        Ok(path) => PlannerConfig::load(&path).unwrap_or_else(|err| {
            log::warn!("falling back to default config: {err}");
            PlannerConfig::default()
        }),
        Err(_) => PlannerConfig::default(),
    }
}

#[cfg(target_arch = "wasm32")]
fn load_config() -> PlannerConfig {
    PlannerConfig::default()
}

#[macroquad::main(window_conf)]
async fn main() {
    autonforge_web_lib::run(load_config()).await;
}
