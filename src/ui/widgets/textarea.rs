use std::rc::Rc;

use glam::{Vec2, Vec4};

use crate::ui::font::Font;
use crate::ui::renderer::{DrawCommand, UiRenderMode, UiRenderer};
use crate::ui::widgets::Widget;

const BASE_COLOR: Vec4 = Vec4::new(0.10, 0.11, 0.14, 1.0);
const FOCUS_COLOR: Vec4 = Vec4::new(0.13, 0.14, 0.18, 1.0);

/// Growable text buffer with a byte-indexed cursor.
///
/// The cursor always sits on a character boundary. Lines are separated by
/// plain `\n`; columns are counted in characters.
#[derive(Default)]
pub struct EditorState {
    pub text: String,
    pub cursor: usize,
}

impl EditorState {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            cursor: text.len(),
        }
    }

    /// Replaces the whole buffer, parking the cursor at the start.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = 0;
    }

    pub fn insert(&mut self, input: &str) {
        self.text.insert_str(self.cursor, input);
        self.cursor += input.len();
    }

    pub fn backspace(&mut self) {
        if let Some(prev) = self.text[..self.cursor].chars().next_back() {
            self.cursor -= prev.len_utf8();
            self.text.remove(self.cursor);
        }
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = self.text[..self.cursor].chars().next_back() {
            self.cursor -= prev.len_utf8();
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = self.text[self.cursor..].chars().next() {
            self.cursor += next.len_utf8();
        }
    }

    /// Line and column of the cursor, both zero-based, column in characters.
    pub fn line_col(&self) -> (usize, usize) {
        let before = &self.text[..self.cursor];
        let line = before.matches('\n').count();
        let col = match before.rfind('\n') {
            Some(i) => before[i + 1..].chars().count(),
            None => before.chars().count(),
        };
        (line, col)
    }

    pub fn line_count(&self) -> usize {
        self.text.split('\n').count()
    }

    /// Byte index for the given line/column, clamped to the line's length.
    pub fn cursor_at(&self, line: usize, col: usize) -> usize {
        let mut start = 0;
        for (i, text_line) in self.text.split('\n').enumerate() {
            if i == line {
                let clamped: usize = text_line
                    .chars()
                    .take(col)
                    .map(|c| c.len_utf8())
                    .sum();
                return start + clamped;
            }
            start += text_line.len() + 1;
        }
        self.text.len()
    }

    pub fn move_up(&mut self) {
        let (line, col) = self.line_col();
        if line > 0 {
            self.cursor = self.cursor_at(line - 1, col);
        }
    }

    pub fn move_down(&mut self) {
        let (line, col) = self.line_col();
        if line + 1 < self.line_count() {
            self.cursor = self.cursor_at(line + 1, col);
        }
    }

    pub fn move_home(&mut self) {
        let (line, _) = self.line_col();
        self.cursor = self.cursor_at(line, 0);
    }

    pub fn move_end(&mut self) {
        let (line, _) = self.line_col();
        self.cursor = self.cursor_at(line, usize::MAX);
    }
}

/// A multiline source editor with a scrolling viewport.
pub struct TextArea {
    pub position: Vec2,
    pub size: Vec2,
    pub editor: EditorState,
    pub text_color: Vec4,
    pub font_size: f32,
    scroll: usize,
    hovered: bool,
    focused: bool,
    font: Rc<Font>,
}

impl TextArea {
    pub fn new(text: &str, text_color: Vec4, font_size: f32, size: Vec2, font: &Rc<Font>) -> Self {
        Self {
            position: Vec2::ZERO,
            size,
            editor: EditorState::new(text),
            text_color,
            font_size,
            scroll: 0,
            hovered: false,
            focused: false,
            font: Rc::clone(font),
        }
    }

    pub fn text(&self) -> &str {
        &self.editor.text
    }

    pub fn set_text(&mut self, text: &str) {
        self.editor.set_text(text);
        self.scroll = 0;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    fn visible_rows(&self) -> usize {
        (self.size.y / self.font_size).floor() as usize
    }

    fn scroll_to_cursor(&mut self) {
        let (line, _) = self.editor.line_col();
        let rows = self.visible_rows().max(1);
        if line < self.scroll {
            self.scroll = line;
        } else if line >= self.scroll + rows {
            self.scroll = line + 1 - rows;
        }
    }
}

impl Widget for TextArea {
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
        let mouse_pos = ctx.mouse.position;
        let mouse_pressed = ctx.mouse.pressed.contains(&sdl2::mouse::MouseButton::Left);
        self.hovered = mouse_pos.x >= self.position.x
            && mouse_pos.x <= self.position.x + self.size.x
            && mouse_pos.y >= self.position.y
            && mouse_pos.y <= self.position.y + self.size.y;

        if mouse_pressed {
            self.focused = self.hovered;
            if self.hovered {
                let char_size = self.font.char_size(self.font_size);
                let line = self.scroll
                    + ((mouse_pos.y - self.position.y) / char_size.y).max(0.0) as usize;
                let col = ((mouse_pos.x - self.position.x) / char_size.x + 0.5).max(0.0) as usize;
                let line = line.min(self.editor.line_count().saturating_sub(1));
                self.editor.cursor = self.editor.cursor_at(line, col);
            }
        }

        if self.hovered && ctx.mouse.scroll_delta.y != 0.0 {
            let max_scroll = self.editor.line_count().saturating_sub(1);
            let delta = ctx.mouse.scroll_delta.y as isize * 3;
            self.scroll = self
                .scroll
                .saturating_add_signed(-delta)
                .min(max_scroll);
        }

        if !self.focused {
            return;
        }

        let repeated = &ctx.keyboard.repeated;
        if repeated.contains(&sdl2::keyboard::Keycode::Backspace) {
            self.editor.backspace();
        } else if repeated.contains(&sdl2::keyboard::Keycode::Return) {
            self.editor.insert("\n");
        } else if repeated.contains(&sdl2::keyboard::Keycode::Tab) {
            self.editor.insert("    ");
        } else if repeated.contains(&sdl2::keyboard::Keycode::Left) {
            self.editor.move_left();
        } else if repeated.contains(&sdl2::keyboard::Keycode::Right) {
            self.editor.move_right();
        } else if repeated.contains(&sdl2::keyboard::Keycode::Up) {
            self.editor.move_up();
        } else if repeated.contains(&sdl2::keyboard::Keycode::Down) {
            self.editor.move_down();
        } else if repeated.contains(&sdl2::keyboard::Keycode::Home) {
            self.editor.move_home();
        } else if repeated.contains(&sdl2::keyboard::Keycode::End) {
            self.editor.move_end();
        } else if !ctx.keyboard.text_input.is_empty() {
            self.editor.insert(&ctx.keyboard.text_input);
        }

        self.scroll_to_cursor();
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

        let char_size = self.font.char_size(self.font_size);
        let max_cols = (self.size.x / char_size.x).floor() as usize;
        let rows = self.visible_rows();

        for (row, line) in self
            .editor
            .text
            .split('\n')
            .skip(self.scroll)
            .take(rows)
            .enumerate()
        {
            let visible: String = line.chars().take(max_cols).collect();
            let origin = self.position + Vec2::new(0.0, row as f32 * char_size.y);
            for mut command in self.font.text(&visible, self.font_size, self.text_color) {
                command.rect[0] += origin;
                command.rect[1] += origin;
                ui_renderer.add_command(command);
            }
        }

        if self.focused {
            let (line, col) = self.editor.line_col();
            if line >= self.scroll && line < self.scroll + rows {
                let cursor_origin = self.position
                    + Vec2::new(
                        col as f32 * char_size.x,
                        (line - self.scroll) as f32 * char_size.y,
                    );
                ui_renderer.add_command(DrawCommand {
                    rect: [
                        cursor_origin,
                        cursor_origin + Vec2::new(2.0, char_size.y),
                    ],
                    uv_rect: [Vec2::ZERO, Vec2::ONE],
                    mode: UiRenderMode::Color(Vec4::ONE),
                });
            }
        }

        ui_renderer.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_backspace() {
        let mut editor = EditorState::new("");
        editor.insert("void main");
        assert_eq!(editor.text, "void main");
        assert_eq!(editor.cursor, 9);
        editor.backspace();
        assert_eq!(editor.text, "void mai");
        assert_eq!(editor.cursor, 8);
    }

    #[test]
    fn backspace_at_start_is_a_no_op() {
        let mut editor = EditorState::new("x");
        editor.cursor = 0;
        editor.backspace();
        assert_eq!(editor.text, "x");
        assert_eq!(editor.cursor, 0);
    }

    #[test]
    fn newline_splits_a_line() {
        let mut editor = EditorState::new("ab");
        editor.cursor = 1;
        editor.insert("\n");
        assert_eq!(editor.text, "a\nb");
        assert_eq!(editor.line_col(), (1, 0));
        assert_eq!(editor.line_count(), 2);
    }

    #[test]
    fn line_col_counts_characters() {
        let editor = EditorState::new("first\nsecond");
        assert_eq!(editor.line_col(), (1, 6));
    }

    #[test]
    fn vertical_movement_clamps_to_line_length() {
        let mut editor = EditorState::new("a long line\nhi\nanother long line");
        editor.cursor = editor.cursor_at(0, 8);
        editor.move_down();
        // "hi" is shorter, cursor clamps to its end
        assert_eq!(editor.line_col(), (1, 2));
        editor.move_down();
        assert_eq!(editor.line_col(), (2, 2));
        editor.move_up();
        editor.move_up();
        assert_eq!(editor.line_col(), (0, 2));
    }

    #[test]
    fn home_and_end_stay_on_the_current_line() {
        let mut editor = EditorState::new("one\ntwo three\nfour");
        editor.cursor = editor.cursor_at(1, 4);
        editor.move_home();
        assert_eq!(editor.line_col(), (1, 0));
        editor.move_end();
        assert_eq!(editor.line_col(), (1, 9));
    }

    #[test]
    fn cursor_stays_on_char_boundaries() {
        let mut editor = EditorState::new("π\nr²");
        editor.cursor = editor.text.len();
        editor.move_left();
        editor.backspace();
        assert_eq!(editor.text, "π\n²");
        editor.move_left();
        assert_eq!(editor.line_col(), (0, 1));
    }
}
