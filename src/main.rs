use std::rc::Rc;

use glam::{Mat4, Vec2};
use glow::HasContext;

use crate::abs::*;
use crate::panel::Panel;
use crate::scene::Scene;
use crate::ui::{Font, UiRenderer};

mod abs;
mod config;
mod input;
mod panel;
mod raster;
mod scene;
mod storage;
mod ui;

const VERTEX_PATH: &str = "data/texture.vs";
const FRAGMENT_PATH: &str = "data/texture.fs";
const MATRIX_PATH: &str = "data/myMatrix.txt";
const IMAGE_PATH: &str = "data/rpi.png";

const FONT_TTF: &[u8] = include_bytes!("../assets/DejaVuSansMono.ttf");
const FONT_ATLAS_PX: f32 = 32.0;

// Fallback sources used when the shader files cannot be read.
const DEFAULT_VERTEX: &str = "#version 330 core

layout (location = 0) in vec3 aPos;

void main()
{
   gl_Position = vec4(aPos, 1.0);
}
";
const DEFAULT_FRAGMENT: &str = "#version 330 core

out vec4 FragColor;

void main()
{
   FragColor = vec4(1.0, 0.0, 0.0, 1.0);
}
";

macro_rules! shader_program {
    ($name:ident, $gl:expr) => {{
        let vert = Shader::new(
            &$gl,
            glow::VERTEX_SHADER,
            include_str!(concat!("shaders/", stringify!($name), "/vert.glsl")),
        )
        .unwrap();
        let frag = Shader::new(
            &$gl,
            glow::FRAGMENT_SHADER,
            include_str!(concat!("shaders/", stringify!($name), "/frag.glsl")),
        )
        .unwrap();
        ShaderProgram::new(&$gl, &[&vert, &frag]).unwrap()
    }};
}

fn setup_logger() -> Result<(), fern::InitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(log::LevelFilter::Info)
        .chain(std::io::stdout())
        .apply()?;
    Ok(())
}

fn main() {
    if let Err(e) = setup_logger() {
        eprintln!("failed to set up logging: {e}");
    }

    let config = config::Config::load("config.json");
    let mut app = match App::new(
        &config.window.title,
        config.window.width,
        config.window.height,
        config.window.vsync,
    ) {
        Ok(app) => app,
        Err(e) => {
            log::error!("failed to create a window with a GL context: {e}");
            std::process::exit(1);
        }
    };

    unsafe {
        app.gl.enable(glow::CULL_FACE);
        app.gl.cull_face(glow::BACK);
        app.gl.front_face(glow::CW);
        app.gl.enable(glow::BLEND);
        app.gl
            .blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
    }

    let vertex_src = storage::read_text(VERTEX_PATH).unwrap_or_else(|e| {
        log::warn!("{e}, using the built-in vertex shader");
        DEFAULT_VERTEX.to_string()
    });
    let fragment_src = storage::read_text(FRAGMENT_PATH).unwrap_or_else(|e| {
        log::warn!("{e}, using the built-in fragment shader");
        DEFAULT_FRAGMENT.to_string()
    });

    let mut program = LiveProgram::new(&app.gl);
    if let Err(e) = program.reload(&vertex_src, &fragment_src) {
        log::error!("initial shader compile failed:\n{e}");
    }

    let font = match Font::new(&app.gl, FONT_TTF, FONT_ATLAS_PX) {
        Ok(font) => Rc::new(font),
        Err(e) => {
            log::error!("failed to build the font atlas: {e}");
            std::process::exit(1);
        }
    };

    let mut ui_renderer = UiRenderer::new(
        &app.gl,
        shader_program!(ui, app.gl),
        Mat4::orthographic_rh_gl(
            0.0,
            config.window.width as f32,
            config.window.height as f32,
            0.0,
            -1.0,
            1.0,
        ),
    );

    let mut scene = Scene::new(&app.gl, IMAGE_PATH, (config.window.width, config.window.height));
    storage::read_matrix(MATRIX_PATH, &mut scene.grid);

    let mut panel = Panel::new(&font, &vertex_src, &fragment_src, &scene.grid);
    panel.position = Vec2::new(10.0, 10.0);

    let mut keyboard_state = input::KeyboardState::default();
    let mut mouse_state = input::MouseState::default();
    let mut last_frame_time = std::time::Instant::now();

    'running: loop {
        let now = std::time::Instant::now();
        let delta_time = now.duration_since(last_frame_time).as_secs_f32();
        last_frame_time = now;

        mouse_state.delta = Vec2::ZERO;
        mouse_state.scroll_delta = Vec2::ZERO;
        keyboard_state.pressed.clear();
        keyboard_state.repeated.clear();
        keyboard_state.text_input.clear();
        mouse_state.pressed.clear();
        mouse_state.released.clear();

        for event in app.event_pump.poll_iter() {
            match event {
                sdl2::event::Event::Quit { .. } => break 'running,
                sdl2::event::Event::Window {
                    win_event: sdl2::event::WindowEvent::Resized(width, height),
                    ..
                } => {
                    unsafe {
                        app.gl.viewport(0, 0, width, height);
                    }
                    ui_renderer.projection_matrix =
                        Mat4::orthographic_rh_gl(0.0, width as f32, height as f32, 0.0, -1.0, 1.0);
                    scene.resize(width as u32, height as u32);
                }
                sdl2::event::Event::MouseMotion {
                    x, y, xrel, yrel, ..
                } => {
                    mouse_state.position = Vec2::new(x as f32, y as f32);
                    mouse_state.delta = Vec2::new(xrel as f32, yrel as f32);
                }
                sdl2::event::Event::MouseWheel { x, y, .. } => {
                    mouse_state.scroll_delta = Vec2::new(x as f32, y as f32);
                }
                sdl2::event::Event::MouseButtonDown { mouse_btn, .. } => {
                    mouse_state.down.insert(mouse_btn);
                    mouse_state.pressed.insert(mouse_btn);
                }
                sdl2::event::Event::MouseButtonUp { mouse_btn, .. } => {
                    mouse_state.down.remove(&mouse_btn);
                    mouse_state.released.insert(mouse_btn);
                }
                sdl2::event::Event::KeyDown {
                    keycode: Some(keycode),
                    repeat,
                    ..
                } => {
                    if !repeat {
                        keyboard_state.pressed.insert(keycode);
                    }
                    keyboard_state.repeated.insert(keycode);
                }
                sdl2::event::Event::TextInput { text, .. } => {
                    keyboard_state.text_input.push_str(&text);
                }
                _ => {}
            }
        }

        if keyboard_state
            .pressed
            .contains(&sdl2::keyboard::Keycode::Escape)
            && !panel.wants_keyboard()
        {
            break 'running;
        }

        unsafe {
            app.gl.clear_color(0.2, 0.3, 0.3, 1.0);
            app.gl.clear(glow::COLOR_BUFFER_BIT);
        }

        let update_ctx = input::UpdateContext::new(&keyboard_state, &mouse_state, delta_time);
        let fps = if delta_time > 0.0 { 1.0 / delta_time } else { 0.0 };

        // The panel goes down first; the scene draws over it. Panel quads wind
        // counter-clockwise, so culling is off while it draws.
        unsafe {
            app.gl.disable(glow::CULL_FACE);
        }
        let request = panel.update(&update_ctx, &mut scene.grid, fps);
        panel.draw(&mut ui_renderer);
        unsafe {
            app.gl.enable(glow::CULL_FACE);
        }

        if request.reload {
            match program.reload(&panel.vertex_source(), &panel.fragment_source()) {
                Ok(()) => log::info!("shader program reloaded"),
                Err(e) => log::error!("shader reload failed, keeping the previous program:\n{e}"),
            }
        }
        if request.save {
            match storage::save_all(
                VERTEX_PATH,
                FRAGMENT_PATH,
                MATRIX_PATH,
                &panel.vertex_source(),
                &panel.fragment_source(),
                &scene.grid,
            ) {
                Ok(()) => log::info!("saved shaders and matrix to {MATRIX_PATH}"),
                Err(e) => log::error!("{e}"),
            }
        }
        if request.swap_texture {
            scene.swap_texture();
        }

        if program.is_linked() {
            scene.render(&program);
        }

        app.window.gl_swap_window();
    }
}
