//! The rendered scene: hand-authored meshes, the two texture slots, the
//! user-editable transform grid and the oscillating offset uniform.

use std::sync::Arc;
use std::time::Instant;

use glam::{Mat4, Vec2, Vec3, vec3};
use glow::HasContext;

use crate::abs::{LiveProgram, Mesh, Texture, TextureOptions, Vertex};
use crate::raster;

/// Vertex with interleaved position, color and texture coordinates.
#[derive(Clone, Copy)]
#[repr(C)]
pub struct SceneVertex {
    pub position: Vec3,
    pub color: Vec3,
    pub uv: Vec2,
}

impl Vertex for SceneVertex {
    fn vertex_attribs(gl: &glow::Context) {
        unsafe {
            let stride = std::mem::size_of::<SceneVertex>() as i32;

            gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);
            gl.enable_vertex_attrib_array(0);

            gl.vertex_attrib_pointer_f32(
                1,
                3,
                glow::FLOAT,
                false,
                stride,
                std::mem::size_of::<Vec3>() as i32,
            );
            gl.enable_vertex_attrib_array(1);

            gl.vertex_attrib_pointer_f32(
                2,
                2,
                glow::FLOAT,
                false,
                stride,
                2 * std::mem::size_of::<Vec3>() as i32,
            );
            gl.enable_vertex_attrib_array(2);
        }
    }
}

/// Vertex carrying raw positions only, used by the cube.
#[derive(Clone, Copy)]
#[repr(C)]
pub struct PositionVertex {
    pub position: Vec3,
}

impl Vertex for PositionVertex {
    fn vertex_attribs(gl: &glow::Context) {
        unsafe {
            let stride = std::mem::size_of::<PositionVertex>() as i32;
            gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);
            gl.enable_vertex_attrib_array(0);
        }
    }
}

/// A triangle wave that ramps between -1 and +1 at a fixed step per frame.
pub struct Wave {
    value: f32,
    step: f32,
}

impl Wave {
    pub fn new(step: f32) -> Self {
        Self { value: 0.0, step }
    }

    /// Advances one step and returns the new value, reversing direction once
    /// the value passes +1 or -1.
    pub fn advance(&mut self) -> f32 {
        self.value += self.step;
        if self.value > 1.0 {
            self.step = -self.step.abs();
        }
        if self.value < -1.0 {
            self.step = self.step.abs();
        }
        self.value
    }

    pub fn value(&self) -> f32 {
        self.value
    }
}

/// Vertex data for the single colored, textured triangle.
pub fn triangle_vertices() -> (Vec<SceneVertex>, Vec<u32>) {
    let vertices = vec![
        SceneVertex {
            position: vec3(1.0, 0.0, 0.0),
            color: vec3(1.0, 0.0, 0.0),
            uv: Vec2::new(1.0, 0.0),
        },
        SceneVertex {
            position: vec3(0.5, 1.0, 0.0),
            color: vec3(0.0, 1.0, 0.0),
            uv: Vec2::new(0.5, 1.0),
        },
        SceneVertex {
            position: vec3(0.0, 0.0, 0.0),
            color: vec3(0.0, 0.0, 1.0),
            uv: Vec2::new(0.0, 0.0),
        },
    ];
    let indices = vec![2, 1, 0];
    (vertices, indices)
}

/// Vertex data for the textured quad, two indexed triangles.
pub fn quad_vertices() -> (Vec<SceneVertex>, Vec<u32>) {
    let vertices = vec![
        SceneVertex {
            position: vec3(0.5, 0.5, 0.0),
            color: vec3(1.0, 0.0, 0.0),
            uv: Vec2::new(1.0, 1.0),
        },
        SceneVertex {
            position: vec3(0.5, -0.5, 0.0),
            color: vec3(0.0, 1.0, 0.0),
            uv: Vec2::new(1.0, 0.0),
        },
        SceneVertex {
            position: vec3(-0.5, 0.5, 0.0),
            color: vec3(0.0, 1.0, 0.0),
            uv: Vec2::new(0.0, 1.0),
        },
        SceneVertex {
            position: vec3(-0.5, -0.5, 0.0),
            color: vec3(0.0, 0.0, 1.0),
            uv: Vec2::new(0.0, 0.0),
        },
    ];
    let indices = vec![0, 1, 2, 3, 2, 1];
    (vertices, indices)
}

/// Raw positions for the cube, 12 triangles drawn without indices.
pub fn cube_vertices() -> Vec<PositionVertex> {
    #[rustfmt::skip]
    let positions: [f32; 108] = [
        -1.0,  1.0, -1.0, -1.0, -1.0, -1.0,  1.0, -1.0, -1.0,  1.0, -1.0, -1.0,  1.0,  1.0, -1.0, -1.0,  1.0, -1.0,
         1.0, -1.0, -1.0,  1.0, -1.0,  1.0,  1.0,  1.0, -1.0,  1.0, -1.0,  1.0,  1.0,  1.0,  1.0,  1.0,  1.0, -1.0,
         1.0, -1.0,  1.0, -1.0, -1.0,  1.0,  1.0,  1.0,  1.0, -1.0, -1.0,  1.0, -1.0,  1.0,  1.0,  1.0,  1.0,  1.0,
        -1.0, -1.0,  1.0, -1.0, -1.0, -1.0, -1.0,  1.0,  1.0, -1.0, -1.0, -1.0, -1.0,  1.0, -1.0, -1.0,  1.0,  1.0,
        -1.0, -1.0,  1.0,  1.0, -1.0,  1.0,  1.0, -1.0, -1.0,  1.0, -1.0, -1.0, -1.0, -1.0, -1.0, -1.0, -1.0,  1.0,
        -1.0,  1.0, -1.0,  1.0,  1.0, -1.0,  1.0,  1.0,  1.0,  1.0,  1.0,  1.0, -1.0,  1.0,  1.0, -1.0,  1.0, -1.0,
    ];
    positions
        .chunks_exact(3)
        .map(|p| PositionVertex {
            position: vec3(p[0], p[1], p[2]),
        })
        .collect()
}

/// Builds the triangle mesh.
pub fn triangle_mesh(gl: &Arc<glow::Context>) -> Mesh {
    let (vertices, indices) = triangle_vertices();
    Mesh::new(gl, &vertices, &indices, glow::TRIANGLES, glow::STATIC_DRAW)
}

/// Builds the textured quad mesh.
pub fn quad_mesh(gl: &Arc<glow::Context>) -> Mesh {
    let (vertices, indices) = quad_vertices();
    Mesh::new(gl, &vertices, &indices, glow::TRIANGLES, glow::STATIC_DRAW)
}

/// Builds the cube mesh, non-indexed.
pub fn cube_mesh(gl: &Arc<glow::Context>) -> Mesh {
    Mesh::new_raw(gl, &cube_vertices(), glow::TRIANGLES, glow::STATIC_DRAW)
}

/// Interprets the row-major user grid as a transform matrix.
///
/// `glam` matrices are column-major, so the grid (rows as the user reads them
/// in the panel) is the transpose of the column array. A translation typed
/// into the last column of the panel ends up in the matrix's `w_axis`.
pub fn grid_to_mat4(grid: &[[f32; 4]; 4]) -> Mat4 {
    Mat4::from_cols_array_2d(grid).transpose()
}

/// The default grid: identity with a small translation in x and y.
pub fn default_grid() -> [[f32; 4]; 4] {
    [
        [1.0, 0.0, 0.0, 0.5],
        [0.0, 1.0, 0.0, 0.5],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// Everything the frame loop needs to draw: mesh records, texture slots, the
/// editable grid and the oscillator.
pub struct Scene {
    pub meshes: Vec<Mesh>,
    pub textures: [Texture; 2],
    pub active_texture: usize,
    pub grid: [[f32; 4]; 4],
    pub wave: Wave,
    projection: Mat4,
    view: Mat4,
    started: Instant,
}

impl Scene {
    /// Sets up meshes and both texture slots.
    ///
    /// Slot 0 is decoded from `image_path`; a decode failure leaves the slot
    /// allocated but blank and rendering continues. Slot 1 is uploaded from
    /// the procedural raster buffer. Slot 1 is nearest-filtered and gets no
    /// mipmap chain.
    pub fn new(gl: &Arc<glow::Context>, image_path: &str, window_size: (u32, u32)) -> Self {
        let meshes = vec![triangle_mesh(gl), quad_mesh(gl), cube_mesh(gl)];

        let file_texture = match image::open(image_path) {
            Ok(decoded) => {
                let texture = Texture::from_image(gl, &decoded.flipv(), TextureOptions::linear());
                log::info!(
                    "loaded {image_path} ({}x{})",
                    texture.width(),
                    texture.height()
                );
                texture
            }
            Err(e) => {
                log::warn!("failed to decode {image_path}: {e}");
                Texture::empty(gl, TextureOptions::linear())
            }
        };

        let buffer = raster::pattern();
        let raster_texture = Texture::from_rgba(
            gl,
            raster::SIZE as u32,
            raster::SIZE as u32,
            &buffer,
            TextureOptions::nearest(),
        );

        Self {
            meshes,
            textures: [file_texture, raster_texture],
            active_texture: 0,
            grid: default_grid(),
            wave: Wave::new(0.01),
            projection: perspective(window_size),
            view: Mat4::from_translation(vec3(0.0, 0.0, -4.0)),
            started: Instant::now(),
        }
    }

    /// Flips between the file-backed and buffer-backed texture slots.
    pub fn swap_texture(&mut self) {
        self.active_texture ^= 1;
    }

    /// Recomputes the projection matrix after a window resize.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.projection = perspective((width, height));
    }

    /// Renders one frame of the scene with the given program.
    ///
    /// Binds the active texture slot and the program, pushes the per-frame
    /// uniforms and issues one draw call per mesh record. The per-mesh
    /// transform accumulates across records, matching the stacked layout of
    /// the three meshes.
    pub fn render(&mut self, program: &LiveProgram) {
        self.textures[self.active_texture].bind(0);
        program.bind();

        program.set_uniform("pMat", self.projection);
        program.set_uniform("vMat", self.view);
        program.set_uniform("tex0", 0i32);
        program.set_uniform("offset", self.wave.advance());

        let user_matrix = grid_to_mat4(&self.grid);
        let angle = self.started.elapsed().as_secs_f32();
        let mut transform = Mat4::IDENTITY;

        for (i, mesh) in self.meshes.iter().enumerate() {
            transform = transform
                * Mat4::from_translation(vec3(0.5, -0.5 + i as f32 * 2.0, 0.0))
                * Mat4::from_rotation_z(angle);

            program.set_uniform("mMat", user_matrix);
            program.set_uniform("mMat2", transform);
            mesh.draw();
        }
    }
}

fn perspective(window_size: (u32, u32)) -> Mat4 {
    // 1.0472 radians = 60 degrees
    Mat4::perspective_rh_gl(
        1.0472,
        window_size.0 as f32 / window_size.1 as f32,
        0.1,
        1000.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wave_stays_within_one_step_of_bounds() {
        let mut wave = Wave::new(0.01);
        let mut hit_top = false;
        let mut hit_bottom = false;
        for _ in 0..1000 {
            let v = wave.advance();
            assert!(v <= 1.011, "overshot top: {v}");
            assert!(v >= -1.011, "overshot bottom: {v}");
            if v >= 1.0 {
                hit_top = true;
            }
            if v <= -1.0 {
                hit_bottom = true;
            }
        }
        assert!(hit_top && hit_bottom);
    }

    #[test]
    fn wave_reverses_direction_at_the_top() {
        let mut wave = Wave::new(0.5);
        assert_eq!(wave.advance(), 0.5);
        assert_eq!(wave.advance(), 1.0);
        // passes 1.0 once, then turns around
        assert_eq!(wave.advance(), 1.5);
        assert_eq!(wave.advance(), 1.0);
        assert_eq!(wave.advance(), 0.5);
    }

    #[test]
    fn triangle_is_a_single_indexed_triangle() {
        let (vertices, indices) = triangle_vertices();
        assert_eq!(vertices.len(), 3);
        assert_eq!(indices, vec![2, 1, 0]);
    }

    #[test]
    fn quad_uses_six_indices() {
        let (vertices, indices) = quad_vertices();
        assert_eq!(vertices.len(), 4);
        assert_eq!(indices.len(), 6);
        for &i in &indices {
            assert!((i as usize) < vertices.len());
        }
    }

    #[test]
    fn cube_is_thirty_six_raw_vertices() {
        assert_eq!(cube_vertices().len(), 36);
    }

    #[test]
    fn scene_vertex_has_eight_float_stride() {
        assert_eq!(
            std::mem::size_of::<SceneVertex>(),
            8 * std::mem::size_of::<f32>()
        );
        assert_eq!(
            std::mem::size_of::<PositionVertex>(),
            3 * std::mem::size_of::<f32>()
        );
    }

    #[test]
    fn grid_translation_lands_in_w_axis() {
        let mut grid = [[0.0; 4]; 4];
        for i in 0..4 {
            grid[i][i] = 1.0;
        }
        grid[0][3] = 0.25;
        grid[1][3] = -0.75;
        let m = grid_to_mat4(&grid);
        assert_eq!(m.w_axis.x, 0.25);
        assert_eq!(m.w_axis.y, -0.75);
        assert_eq!(m.x_axis.x, 1.0);
        assert_eq!(m.x_axis.y, 0.0);
    }
}
