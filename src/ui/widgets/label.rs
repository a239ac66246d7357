use std::rc::Rc;

use glam::{Vec2, Vec4};

use crate::ui::font::Font;
use crate::ui::renderer::UiRenderer;
use crate::ui::widgets::Widget;

pub struct Label {
    pub text: String,
    pub position: Vec2,
    pub font_size: f32,
    pub color: Vec4,
    pub font: Rc<Font>,
}

impl Label {
    pub fn new(text: &str, font_size: f32, color: Vec4, font: &Rc<Font>) -> Self {
        Self {
            text: text.to_string(),
            position: Vec2::ZERO,
            font_size,
            color,
            font: Rc::clone(font),
        }
    }
}

impl Widget for Label {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }

    fn size_hint(&self) -> Vec2 {
        self.font.measure_text(&self.text, self.font_size)
    }

    fn update(&mut self, _ctx: &crate::input::UpdateContext) {
        // Labels are static; no update logic needed.
    }

    fn layout(&mut self, ctx: &super::LayoutContext) -> Vec2 {
        let measured_size = self.size_hint();
        self.position = ctx.cursor;
        Vec2::new(
            measured_size.x.min(ctx.max_size.x),
            measured_size.y.min(ctx.max_size.y),
        )
    }

    fn draw(&self, ui_renderer: &mut UiRenderer) {
        let commands = self
            .font
            .text(&self.text, self.font_size, self.color)
            .into_iter()
            .map(|mut cmd| {
                cmd.rect[0] += self.position;
                cmd.rect[1] += self.position;
                cmd
            });

        for command in commands {
            ui_renderer.add_command(command);
        }

        ui_renderer.finish();
    }
}
