//! The control panel: shader editors, action buttons and the transform grid.
//!
//! The panel is a single widget tree polled once per frame. Matrix cells
//! commit when their field loses focus; a cell that fails to parse snaps back
//! to the grid's current value.

use std::rc::Rc;

use glam::{Vec2, Vec4, vec2, vec4};

use crate::input::UpdateContext;
use crate::ui::Font;
use crate::ui::renderer::UiRenderer;
use crate::ui::widgets::{
    Alignment, Button, Column, InputField, Justification, Label, LayoutContext, Row, TextArea,
    Widget,
};

const TEXT_COLOR: Vec4 = Vec4::new(0.92, 0.93, 0.95, 1.0);
const HEADING_COLOR: Vec4 = Vec4::new(0.65, 0.70, 0.78, 1.0);
const FONT_SIZE: f32 = 16.0;
const EDITOR_SIZE: Vec2 = Vec2::new(420.0, 200.0);
const BUTTON_SIZE: Vec2 = Vec2::new(130.0, 28.0);
const CELL_SIZE: Vec2 = Vec2::new(99.0, 24.0);
const NUMERIC: &str = "0123456789.+-eE";

// Widget indices within the root column.
const FPS_LABEL: usize = 0;
const VERTEX_EDITOR: usize = 2;
const FRAGMENT_EDITOR: usize = 4;
const BUTTON_ROW: usize = 5;
const FIRST_GRID_ROW: usize = 6;

/// Actions the user triggered this frame.
#[derive(Default)]
pub struct PanelRequest {
    pub reload: bool,
    pub save: bool,
    pub swap_texture: bool,
}

pub struct Panel {
    pub position: Vec2,
    pub size: Vec2,
    container: Column,
}

impl Panel {
    pub fn new(font: &Rc<Font>, vertex_src: &str, fragment_src: &str, grid: &[[f32; 4]; 4]) -> Self {
        let mut container = Column::new(
            8.0,
            Alignment::Start,
            vec4(10.0, 10.0, 10.0, 10.0),
            Justification::Start,
        );

        container.add_widget(Label::new("", FONT_SIZE, TEXT_COLOR, font));
        container.add_widget(Label::new("Vertex Shader", FONT_SIZE, HEADING_COLOR, font));
        container.add_widget(TextArea::new(
            vertex_src,
            TEXT_COLOR,
            FONT_SIZE,
            EDITOR_SIZE,
            font,
        ));
        container.add_widget(Label::new("Fragment Shader", FONT_SIZE, HEADING_COLOR, font));
        container.add_widget(TextArea::new(
            fragment_src,
            TEXT_COLOR,
            FONT_SIZE,
            EDITOR_SIZE,
            font,
        ));

        let mut buttons = Row::new(
            10.0,
            Alignment::Center,
            Vec4::ZERO,
            Justification::Start,
        );
        buttons.add_widget(Button::new("Use", TEXT_COLOR, FONT_SIZE, BUTTON_SIZE, font));
        buttons.add_widget(Button::new("Save", TEXT_COLOR, FONT_SIZE, BUTTON_SIZE, font));
        buttons.add_widget(Button::new(
            "Swap Texture",
            TEXT_COLOR,
            FONT_SIZE,
            BUTTON_SIZE,
            font,
        ));
        container.add_widget(buttons);

        for row in grid {
            let mut cells = Row::new(6.0, Alignment::Center, Vec4::ZERO, Justification::Start);
            for value in row {
                let mut field =
                    InputField::new(TEXT_COLOR, FONT_SIZE, CELL_SIZE, Some(NUMERIC), font);
                field.set_text(&value.to_string());
                cells.add_widget(field);
            }
            container.add_widget(cells);
        }

        Self {
            position: Vec2::ZERO,
            size: vec2(
                EDITOR_SIZE.x + 20.0,
                EDITOR_SIZE.y * 2.0 + FONT_SIZE * 3.0 + BUTTON_SIZE.y + CELL_SIZE.y * 4.0 + 100.0,
            ),
            container,
        }
    }

    /// Runs one frame of panel interaction.
    ///
    /// Updates the fps readout, polls the action buttons and commits any
    /// matrix cell whose field lost focus this frame.
    pub fn update(
        &mut self,
        ctx: &UpdateContext,
        grid: &mut [[f32; 4]; 4],
        fps: f32,
    ) -> PanelRequest {
        if let Some(label) = self.container.get_widget_mut::<Label>(FPS_LABEL) {
            label.text = format!("{fps:.0} fps");
        }

        self.container.update(ctx);
        self.container.layout(&LayoutContext {
            max_size: self.size,
            cursor: self.position,
        });

        let mut request = PanelRequest::default();
        for (index, flag) in [
            (0, &mut request.reload),
            (1, &mut request.save),
            (2, &mut request.swap_texture),
        ] {
            if let Some(button) = self.container.find_widget::<Button>(&[BUTTON_ROW, index]) {
                *flag = button.is_pressed();
            }
        }

        for row in 0..4 {
            for col in 0..4 {
                let Some(field) = self
                    .container
                    .find_widget_mut::<InputField>(&[FIRST_GRID_ROW + row, col])
                else {
                    continue;
                };
                if !field.just_unfocused() {
                    continue;
                }
                match field.text.parse::<f32>() {
                    Ok(value) => grid[row][col] = value,
                    Err(_) => field.set_text(&grid[row][col].to_string()),
                }
            }
        }

        request
    }

    pub fn vertex_source(&self) -> String {
        self.container
            .get_widget::<TextArea>(VERTEX_EDITOR)
            .map(|e| e.text().to_string())
            .unwrap_or_default()
    }

    pub fn fragment_source(&self) -> String {
        self.container
            .get_widget::<TextArea>(FRAGMENT_EDITOR)
            .map(|e| e.text().to_string())
            .unwrap_or_default()
    }

    /// True while either shader editor owns the keyboard.
    pub fn wants_keyboard(&self) -> bool {
        [VERTEX_EDITOR, FRAGMENT_EDITOR].iter().any(|&i| {
            self.container
                .get_widget::<TextArea>(i)
                .is_some_and(|e| e.is_focused())
        }) || (0..4).any(|row| {
            (0..4).any(|col| {
                self.container
                    .find_widget::<InputField>(&[FIRST_GRID_ROW + row, col])
                    .is_some_and(|f| f.is_focused())
            })
        })
    }

    pub fn draw(&self, ui_renderer: &mut UiRenderer) {
        self.container.draw(ui_renderer);
    }
}
