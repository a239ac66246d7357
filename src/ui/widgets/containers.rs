//! Containers that can hold multiple widgets.

use glam::{Vec2, Vec4};

use crate::ui::widgets::Widget;

/// Alignment options for widgets within a container.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Alignment {
    Start,
    Center,
    End,
}

/// Justification options for widgets within a container.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Justification {
    Start,
    Center,
    End,
    SpaceBetween,
}

/// A vertical column container that arranges its child widgets vertically.
pub struct Column {
    pub widgets: Vec<Box<dyn Widget>>,
    pub spacing: f32,
    pub alignment: Alignment,
    pub padding: Vec4,
    pub justification: Justification,
    pub min_size: Vec2,
}

impl Column {
    /// Creates a new `Column` container with the specified spacing, alignment,
    /// padding, and justification.
    pub fn new(
        spacing: f32,
        alignment: Alignment,
        padding: Vec4,
        justification: Justification,
    ) -> Self {
        Self {
            widgets: Vec::new(),
            spacing,
            alignment,
            padding,
            justification,
            min_size: Vec2::ZERO,
        }
    }

    /// Adds a widget to the column.
    pub fn add_widget<T: Widget + 'static>(&mut self, widget: T) {
        self.widgets.push(Box::new(widget));
    }

    /// Gets a certain widget by index.
    pub fn get_widget<T: Widget + 'static>(&self, index: usize) -> Option<&T> {
        self.widgets.get(index)?.as_any().downcast_ref::<T>()
    }

    /// Gets a certain widget by index as mutable.
    pub fn get_widget_mut<T: Widget + 'static>(&mut self, index: usize) -> Option<&mut T> {
        self.widgets
            .get_mut(index)?
            .as_any_mut()
            .downcast_mut::<T>()
    }

    /// Traverses through containers to find a widget of type T.
    pub fn find_widget<T: Widget + 'static>(&self, indices: &[usize]) -> Option<&T> {
        find_widget(self, indices)
    }

    /// Traverses through containers to find a widget of type T, mutably.
    pub fn find_widget_mut<T: Widget + 'static>(&mut self, indices: &[usize]) -> Option<&mut T> {
        find_widget_mut(self, indices)
    }
}

impl Widget for Column {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }

    fn size_hint(&self) -> Vec2 {
        let mut width: f32 = 0.0;
        let mut height: f32 = 0.0;

        for widget in &self.widgets {
            let size = widget.size_hint();
            width = width.max(size.x);
            height += size.y;
        }

        height += self.spacing * (self.widgets.len().saturating_sub(1)) as f32;
        width += self.padding.x + self.padding.z;
        height += self.padding.y + self.padding.w;

        Vec2::new(width, height).max(self.min_size)
    }

    fn update(&mut self, ctx: &crate::input::UpdateContext) {
        for widget in &mut self.widgets {
            widget.update(ctx);
        }
    }

    fn layout(&mut self, ctx: &super::LayoutContext) -> Vec2 {
        let total_height: f32 = self.widgets.iter().map(|w| w.size_hint().y).sum();

        let spacing = match self.justification {
            Justification::SpaceBetween if self.widgets.len() > 1 => {
                let content_height = ctx.max_size.y - self.padding.y - self.padding.w;
                ((content_height - total_height) / (self.widgets.len() as f32 - 1.0)).max(0.0)
            }
            _ => self.spacing,
        };

        let laid_out_height =
            total_height + spacing * (self.widgets.len().saturating_sub(1)) as f32;

        let mut cursor_y = match self.justification {
            Justification::Center => {
                ctx.cursor.y + (ctx.max_size.y - laid_out_height) / 2.0 + self.padding.y
            }
            Justification::End => ctx.cursor.y + ctx.max_size.y - laid_out_height - self.padding.w,
            _ => ctx.cursor.y + self.padding.y,
        };

        for widget in self.widgets.iter_mut() {
            let widget_size = widget.size_hint();
            let offset_x = match self.alignment {
                Alignment::Start => self.padding.x,
                Alignment::Center => (ctx.max_size.x - widget_size.x) / 2.0,
                Alignment::End => ctx.max_size.x - widget_size.x - self.padding.z,
            };

            widget.layout(&super::LayoutContext {
                max_size: widget_size,
                cursor: Vec2::new(ctx.cursor.x + offset_x, cursor_y),
            });
            cursor_y += widget_size.y + spacing;
        }

        Vec2::new(
            ctx.max_size.x,
            laid_out_height + self.padding.y + self.padding.w,
        )
    }

    fn draw(&self, ui_renderer: &mut crate::ui::renderer::UiRenderer) {
        for widget in &self.widgets {
            widget.draw(ui_renderer);
        }
    }
}

/// A horizontal row container that arranges its child widgets horizontally.
pub struct Row {
    pub widgets: Vec<Box<dyn Widget>>,
    pub spacing: f32,
    pub alignment: Alignment,
    pub padding: Vec4,
    pub justification: Justification,
    pub min_size: Vec2,
}

impl Row {
    /// Creates a new `Row` container with the specified spacing, alignment,
    /// padding, and justification.
    pub fn new(
        spacing: f32,
        alignment: Alignment,
        padding: Vec4,
        justification: Justification,
    ) -> Self {
        Self {
            widgets: Vec::new(),
            spacing,
            alignment,
            padding,
            justification,
            min_size: Vec2::ZERO,
        }
    }

    /// Adds a widget to the row.
    pub fn add_widget<T: Widget + 'static>(&mut self, widget: T) {
        self.widgets.push(Box::new(widget));
    }

    /// Gets a certain widget by index.
    pub fn get_widget<T: Widget + 'static>(&self, index: usize) -> Option<&T> {
        self.widgets.get(index)?.as_any().downcast_ref::<T>()
    }

    /// Gets a certain widget by index as mutable.
    pub fn get_widget_mut<T: Widget + 'static>(&mut self, index: usize) -> Option<&mut T> {
        self.widgets
            .get_mut(index)?
            .as_any_mut()
            .downcast_mut::<T>()
    }

    /// Traverses through containers to find a widget of type T.
    pub fn find_widget<T: Widget + 'static>(&self, indices: &[usize]) -> Option<&T> {
        find_widget(self, indices)
    }

    /// Traverses through containers to find a widget of type T, mutably.
    pub fn find_widget_mut<T: Widget + 'static>(&mut self, indices: &[usize]) -> Option<&mut T> {
        find_widget_mut(self, indices)
    }
}

impl Widget for Row {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }

    fn size_hint(&self) -> Vec2 {
        let mut width: f32 = 0.0;
        let mut height: f32 = 0.0;

        for widget in &self.widgets {
            let size = widget.size_hint();
            width += size.x;
            height = height.max(size.y);
        }

        width += self.spacing * (self.widgets.len().saturating_sub(1)) as f32;
        width += self.padding.x + self.padding.z;
        height += self.padding.y + self.padding.w;

        Vec2::new(width, height).max(self.min_size)
    }

    fn update(&mut self, ctx: &crate::input::UpdateContext) {
        for widget in &mut self.widgets {
            widget.update(ctx);
        }
    }

    fn layout(&mut self, ctx: &super::LayoutContext) -> Vec2 {
        let total_width: f32 = self.widgets.iter().map(|w| w.size_hint().x).sum();

        let spacing = match self.justification {
            Justification::SpaceBetween if self.widgets.len() > 1 => {
                let content_width = ctx.max_size.x - self.padding.x - self.padding.z;
                ((content_width - total_width) / (self.widgets.len() as f32 - 1.0)).max(0.0)
            }
            _ => self.spacing,
        };

        let laid_out_width = total_width + spacing * (self.widgets.len().saturating_sub(1)) as f32;

        let mut cursor_x = match self.justification {
            Justification::Center => {
                ctx.cursor.x + (ctx.max_size.x - laid_out_width) / 2.0 + self.padding.x
            }
            Justification::End => ctx.cursor.x + ctx.max_size.x - laid_out_width - self.padding.z,
            _ => ctx.cursor.x + self.padding.x,
        };

        for widget in self.widgets.iter_mut() {
            let widget_size = widget.size_hint();
            let offset_y = match self.alignment {
                Alignment::Start => self.padding.y,
                Alignment::Center => (ctx.max_size.y - widget_size.y) / 2.0,
                Alignment::End => ctx.max_size.y - widget_size.y - self.padding.w,
            };

            widget.layout(&super::LayoutContext {
                max_size: widget_size,
                cursor: Vec2::new(cursor_x, ctx.cursor.y + offset_y),
            });
            cursor_x += widget_size.x + spacing;
        }

        Vec2::new(
            laid_out_width + self.padding.x + self.padding.z,
            ctx.max_size.y,
        )
    }

    fn draw(&self, ui_renderer: &mut crate::ui::renderer::UiRenderer) {
        for widget in &self.widgets {
            widget.draw(ui_renderer);
        }
    }
}

fn find_widget<'a, T: Widget + 'static>(
    root: &'a dyn Widget,
    indices: &[usize],
) -> Option<&'a T> {
    let mut current: &dyn Widget = root;
    for &index in indices {
        let container = current.as_any();
        current = if let Some(column) = container.downcast_ref::<Column>() {
            column.widgets.get(index)?.as_ref()
        } else if let Some(row) = container.downcast_ref::<Row>() {
            row.widgets.get(index)?.as_ref()
        } else {
            return None;
        };
    }
    current.as_any().downcast_ref::<T>()
}

fn find_widget_mut<'a, T: Widget + 'static>(
    root: &'a mut dyn Widget,
    indices: &[usize],
) -> Option<&'a mut T> {
    let mut current: &mut dyn Widget = root;
    for &index in indices {
        let container = current.as_any_mut();
        current = if container.is::<Column>() {
            container
                .downcast_mut::<Column>()
                .unwrap()
                .widgets
                .get_mut(index)?
                .as_mut()
        } else if container.is::<Row>() {
            container
                .downcast_mut::<Row>()
                .unwrap()
                .widgets
                .get_mut(index)?
                .as_mut()
        } else {
            return None;
        };
    }
    current.as_any_mut().downcast_mut::<T>()
}
