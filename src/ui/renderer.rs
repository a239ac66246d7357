//! Batched quad renderer for the control panel.

use std::sync::Arc;

use glam::{Mat4, Vec2, Vec4};
use glow::HasContext;

use crate::abs::{Mesh, ShaderProgram, TextureHandle, Vertex};

/// Vertex layout for panel quads.
#[derive(Clone, Copy)]
#[repr(C)]
pub struct UiVertex {
    pub position: Vec2,
    pub uv: Vec2,
}

impl Vertex for UiVertex {
    fn vertex_attribs(gl: &glow::Context) {
        unsafe {
            let stride = std::mem::size_of::<UiVertex>() as i32;

            gl.vertex_attrib_pointer_f32(0, 2, glow::FLOAT, false, stride, 0);
            gl.enable_vertex_attrib_array(0);

            gl.vertex_attrib_pointer_f32(
                1,
                2,
                glow::FLOAT,
                false,
                stride,
                std::mem::size_of::<Vec2>() as i32,
            );
            gl.enable_vertex_attrib_array(1);
        }
    }
}

/// The rendering mode for a panel element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UiRenderMode {
    Texture(TextureHandle, Vec4),
    Color(Vec4),
}

/// A draw command for rendering a panel element.
pub struct DrawCommand {
    pub rect: [Vec2; 2],
    pub uv_rect: [Vec2; 2],
    pub mode: UiRenderMode,
}

/// Renders 2D panel elements, batching consecutive commands that share a mode.
pub struct UiRenderer {
    gl: Arc<glow::Context>,
    shader_program: ShaderProgram,
    pub projection_matrix: Mat4,
    last_command: Option<DrawCommand>,
    vertices: Vec<UiVertex>,
    indices: Vec<u32>,
}

impl UiRenderer {
    /// Creates a new panel renderer.
    pub fn new(
        gl: &Arc<glow::Context>,
        shader_program: ShaderProgram,
        projection_matrix: Mat4,
    ) -> Self {
        Self {
            gl: Arc::clone(gl),
            shader_program,
            projection_matrix,
            last_command: None,
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Adds a draw command, flushing the batch when the mode changes.
    pub fn add_command(&mut self, command: DrawCommand) {
        if let Some(last_command) = &self.last_command {
            if last_command.mode != command.mode {
                self.finish();
            }
        }
        self.append_command(&command);
        self.last_command = Some(command);
    }

    /// Finishes the current batch and draws it.
    pub fn finish(&mut self) {
        self.draw_mesh();
        self.vertices.clear();
        self.indices.clear();
        self.last_command = None;
    }

    fn draw_mesh(&mut self) {
        if self.vertices.is_empty() || self.indices.is_empty() {
            return;
        }

        // Batch geometry lives for one draw call, so hint dynamic usage.
        let mesh = Mesh::new(
            &self.gl,
            &self.vertices,
            &self.indices,
            glow::TRIANGLES,
            glow::DYNAMIC_DRAW,
        );

        self.shader_program.use_program();
        self.shader_program
            .set_uniform("u_projection", self.projection_matrix);

        if let Some(last_command) = &self.last_command {
            match last_command.mode {
                UiRenderMode::Texture(texture_handle, color) => {
                    texture_handle.bind(&self.gl, 0);
                    self.shader_program.set_uniform("u_tex", 0);
                    self.shader_program.set_uniform("u_color", color);
                    self.shader_program.set_uniform("u_solid", false);
                }
                UiRenderMode::Color(color) => {
                    self.shader_program.set_uniform("u_color", color);
                    self.shader_program.set_uniform("u_solid", true);
                }
            }
        }

        mesh.draw();
    }

    fn append_command(&mut self, command: &DrawCommand) {
        let base_index = self.vertices.len() as u32;
        let [min, max] = command.rect;
        let [uv_min, uv_max] = command.uv_rect;

        self.vertices.push(UiVertex {
            position: Vec2::new(max.x, min.y),
            uv: Vec2::new(uv_max.x, uv_min.y),
        });
        self.vertices.push(UiVertex {
            position: Vec2::new(min.x, min.y),
            uv: Vec2::new(uv_min.x, uv_min.y),
        });
        self.vertices.push(UiVertex {
            position: Vec2::new(min.x, max.y),
            uv: Vec2::new(uv_min.x, uv_max.y),
        });
        self.vertices.push(UiVertex {
            position: Vec2::new(max.x, max.y),
            uv: Vec2::new(uv_max.x, uv_max.y),
        });
        self.indices.push(base_index);
        self.indices.push(base_index + 1);
        self.indices.push(base_index + 2);
        self.indices.push(base_index);
        self.indices.push(base_index + 2);
        self.indices.push(base_index + 3);
    }
}
