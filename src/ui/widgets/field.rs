use std::rc::Rc;

use glam::{Vec2, Vec4};

use crate::ui::font::Font;
use crate::ui::renderer::{DrawCommand, UiRenderMode, UiRenderer};
use crate::ui::widgets::Widget;

const BASE_COLOR: Vec4 = Vec4::new(0.12, 0.13, 0.16, 1.0);
const FOCUS_COLOR: Vec4 = Vec4::new(0.16, 0.18, 0.22, 1.0);

/// A single-line text field, optionally restricted to a character set.
pub struct InputField {
    pub position: Vec2,
    pub size: Vec2,
    pub text: String,
    pub label_color: Vec4,
    pub label_font_size: f32,
    pub cursor_pos: usize,
    /// When set, typed characters outside this set are discarded.
    pub allowed: Option<String>,
    hovered: bool,
    focused: bool,
    focused_last: bool,
    font: Rc<Font>,
}

impl InputField {
    pub fn new(
        label_color: Vec4,
        label_font_size: f32,
        size: Vec2,
        allowed: Option<&str>,
        font: &Rc<Font>,
    ) -> Self {
        Self {
            position: Vec2::ZERO,
            size,
            text: String::new(),
            label_color,
            label_font_size,
            cursor_pos: 0,
            allowed: allowed.map(|s| s.to_string()),
            hovered: false,
            focused: false,
            focused_last: false,
            font: Rc::clone(font),
        }
    }

    /// Replaces the contents and parks the cursor at the end.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor_pos = self.text.len();
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// True for the one frame after focus was lost, the moment to commit.
    pub fn just_unfocused(&self) -> bool {
        !self.focused && self.focused_last
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }
}

impl Widget for InputField {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }

    fn size_hint(&self) -> Vec2 {
        self.size
    }

    fn update(&mut self, ctx: &crate::input::UpdateContext) {
        self.focused_last = self.focused;
        let mouse_pos = ctx.mouse.position;
        let mouse_pressed = ctx.mouse.pressed.contains(&sdl2::mouse::MouseButton::Left);
        self.hovered = mouse_pos.x >= self.position.x
            && mouse_pos.x <= self.position.x + self.size.x
            && mouse_pos.y >= self.position.y
            && mouse_pos.y <= self.position.y + self.size.y;
        if mouse_pressed {
            self.focused = self.hovered;
        }

        if !self.focused {
            return;
        }

        let repeated = &ctx.keyboard.repeated;
        if repeated.contains(&sdl2::keyboard::Keycode::Return) {
            self.focused = false;
        } else if repeated.contains(&sdl2::keyboard::Keycode::Backspace) {
            if let Some(prev) = self.text[..self.cursor_pos].chars().next_back() {
                self.cursor_pos -= prev.len_utf8();
                self.text.remove(self.cursor_pos);
            }
        } else if repeated.contains(&sdl2::keyboard::Keycode::Left) {
            if let Some(prev) = self.text[..self.cursor_pos].chars().next_back() {
                self.cursor_pos -= prev.len_utf8();
            }
        } else if repeated.contains(&sdl2::keyboard::Keycode::Right) {
            if let Some(next) = self.text[self.cursor_pos..].chars().next() {
                self.cursor_pos += next.len_utf8();
            }
        } else if repeated.contains(&sdl2::keyboard::Keycode::Home) {
            self.cursor_pos = 0;
        } else if repeated.contains(&sdl2::keyboard::Keycode::End) {
            self.cursor_pos = self.text.len();
        } else if !ctx.keyboard.text_input.is_empty() {
            let input: String = match &self.allowed {
                Some(allowed) => ctx
                    .keyboard
                    .text_input
                    .chars()
                    .filter(|c| allowed.contains(*c))
                    .collect(),
                None => ctx.keyboard.text_input.clone(),
            };
            self.text.insert_str(self.cursor_pos, &input);
            self.cursor_pos += input.len();
        }
    }

    fn layout(&mut self, ctx: &super::LayoutContext) -> Vec2 {
        let measured_size = self.size_hint().min(ctx.max_size);
        self.position = ctx.cursor;
        measured_size
    }

    fn draw(&self, ui_renderer: &mut UiRenderer) {
        ui_renderer.add_command(DrawCommand {
            rect: [self.position, self.position + self.size],
            uv_rect: [Vec2::ZERO, Vec2::ONE],
            mode: UiRenderMode::Color(if self.focused { FOCUS_COLOR } else { BASE_COLOR }),
        });

        let char_size = self.font.char_size(self.label_font_size);
        let text_origin = Vec2::new(
            self.position.x + char_size.x * 0.5,
            self.position.y + (self.size.y - self.label_font_size) / 2.0,
        );
        for mut command in self
            .font
            .text(&self.text, self.label_font_size, self.label_color)
        {
            command.rect[0] += text_origin;
            command.rect[1] += text_origin;
            ui_renderer.add_command(command);
        }

        if self.focused {
            let cursor_x =
                text_origin.x + self.text[..self.cursor_pos].chars().count() as f32 * char_size.x;
            ui_renderer.add_command(DrawCommand {
                rect: [
                    Vec2::new(cursor_x, text_origin.y),
                    Vec2::new(cursor_x + 2.0, text_origin.y + self.label_font_size),
                ],
                uv_rect: [Vec2::ZERO, Vec2::ONE],
                mode: UiRenderMode::Color(Vec4::ONE),
            });
        }

        ui_renderer.finish();
    }
}
