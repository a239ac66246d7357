//! The control panel toolkit: font atlas, batched renderer, and widgets.

pub mod font;
pub mod renderer;
pub mod widgets;

pub use font::Font;
pub use renderer::{DrawCommand, UiRenderMode, UiRenderer, UiVertex};
