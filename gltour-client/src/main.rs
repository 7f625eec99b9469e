use std::process::ExitCode;
use std::time::Instant;

use gltour_core::{Config, Session, Stage};

use crate::abs::App;
use crate::input::{Bindings, InputState, SdlInput};
use crate::render::StageRenderer;

mod abs;
mod input;
mod logging;
mod render;

fn main() -> ExitCode {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            println!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init(config.log_filter()) {
        println!("Failed to set up logging: {}", e);
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Reads the config file, then applies the optional stage argument.
fn load_config() -> Result<Config, String> {
    let mut config = Config::locate()?;
    if let Some(stage) = std::env::args().nth(1) {
        config.stage = stage.parse::<Stage>()?;
    }
    Ok(config)
}

fn run(config: &Config) -> Result<(), String> {
    let mut app = App::new(&config.window).map_err(|e| format!("Failed to create window: {}", e))?;
    let bindings = Bindings::from_names(&config.bindings)?;
    let mouse_util = app.sdl.mouse();

    let mut session = Session::from_config(config);
    let (width, height) = app.window.size();
    session.resize(width, height);

    let renderer = StageRenderer::new(&app.gl, config)?;
    let (width, height) = app.drawable_size();
    renderer.resize(width, height);

    let mut input = InputState::default();
    let start = Instant::now();
    log::info!("Running stage '{}'", session.stage());

    'running: loop {
        for event in app.event_pump.poll_iter() {
            input.handle_event(&event);
            match event {
                sdl2::event::Event::Quit { .. } => break 'running,
                sdl2::event::Event::Window {
                    win_event: sdl2::event::WindowEvent::SizeChanged(..),
                    ..
                } => {
                    // GL viewports are in pixels, cursor coordinates in window points.
                    let (width, height) = app.window.drawable_size();
                    if width > 0 && height > 0 {
                        renderer.resize(width, height);
                    }
                    let (width, height) = app.window.size();
                    if width > 0 && height > 0 {
                        session.resize(width, height);
                    }
                }
                _ => {}
            }
        }

        let mut source = SdlInput {
            state: &mut input,
            bindings: &bindings,
            mouse_util: &mouse_util,
            window: &app.window,
        };
        session.update(&mut source, start.elapsed().as_secs_f64());

        renderer.draw(&session);
        app.window.gl_swap_window();
    }

    mouse_util.show_cursor(true);
    log::info!("Window closed");
    Ok(())
}
