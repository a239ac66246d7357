use std::rc::Rc;

use glam::{Vec2, Vec4};

use crate::ui::font::Font;
use crate::ui::renderer::{DrawCommand, UiRenderMode, UiRenderer};
use crate::ui::widgets::Widget;

const BASE_COLOR: Vec4 = Vec4::new(0.26, 0.28, 0.33, 1.0);
const HOVER_COLOR: Vec4 = Vec4::new(0.34, 0.37, 0.43, 1.0);
const DOWN_COLOR: Vec4 = Vec4::new(0.18, 0.20, 0.24, 1.0);

pub struct Button {
    pub position: Vec2,
    pub size: Vec2,
    pub label: String,
    pub label_color: Vec4,
    pub label_font_size: f32,
    is_down: bool,
    is_down_last: bool,
    hovered: bool,
    font: Rc<Font>,
}

impl Button {
    pub fn new(
        label: &str,
        label_color: Vec4,
        label_font_size: f32,
        size: Vec2,
        font: &Rc<Font>,
    ) -> Self {
        Self {
            position: Vec2::ZERO,
            size,
            label: label.to_string(),
            label_color,
            label_font_size,
            is_down: false,
            is_down_last: false,
            hovered: false,
            font: Rc::clone(font),
        }
    }

    pub fn is_down(&self) -> bool {
        self.is_down
    }

    pub fn is_pressed(&self) -> bool {
        self.is_down && !self.is_down_last
    }

    pub fn is_released(&self) -> bool {
        !self.is_down && self.is_down_last
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }
}

impl Widget for Button {
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
        self.is_down_last = self.is_down;
        let mouse_pos = ctx.mouse.position;
        let mouse_down = ctx.mouse.down.contains(&sdl2::mouse::MouseButton::Left);
        self.hovered = mouse_pos.x >= self.position.x
            && mouse_pos.x <= self.position.x + self.size.x
            && mouse_pos.y >= self.position.y
            && mouse_pos.y <= self.position.y + self.size.y;
        self.is_down = mouse_down && self.hovered;
    }

    fn layout(&mut self, ctx: &super::LayoutContext) -> Vec2 {
        let measured_size = self.size_hint().min(ctx.max_size);
        self.position = ctx.cursor;
        measured_size
    }

    fn draw(&self, ui_renderer: &mut UiRenderer) {
        let background = if self.is_down {
            DOWN_COLOR
        } else if self.hovered {
            HOVER_COLOR
        } else {
            BASE_COLOR
        };
        ui_renderer.add_command(DrawCommand {
            rect: [self.position, self.position + self.size],
            uv_rect: [Vec2::ZERO, Vec2::ONE],
            mode: UiRenderMode::Color(background),
        });

        let text_size = self.font.measure_text(&self.label, self.label_font_size);
        let text_origin = self.position + (self.size - text_size) / 2.0;
        for mut command in self
            .font
            .text(&self.label, self.label_font_size, self.label_color)
        {
            command.rect[0] += text_origin;
            command.rect[1] += text_origin;
            ui_renderer.add_command(command);
        }

        ui_renderer.finish();
    }
}
