//! Structs and functions for handling textures.
//!
//! The module provides the [`Texture`] struct which is a CPU handle to a GPU
//! texture, created either from a decoded image or from a raw RGBA buffer.

use std::{num::NonZero, sync::Arc};

use glow::HasContext;
use image::{DynamicImage, GenericImageView};

/// Sampling and upload parameters for a texture.
#[derive(Clone, Copy, Debug)]
pub struct TextureOptions {
    pub min_filter: u32,
    pub mag_filter: u32,
    pub wrap: u32,
    pub mipmaps: bool,
}

impl TextureOptions {
    /// Linear filtering with repeat wrapping and a mipmap chain.
    pub fn linear() -> Self {
        Self {
            min_filter: glow::LINEAR,
            mag_filter: glow::LINEAR,
            wrap: glow::REPEAT,
            mipmaps: true,
        }
    }

    /// Nearest filtering with repeat wrapping and no mipmaps.
    pub fn nearest() -> Self {
        Self {
            min_filter: glow::NEAREST,
            mag_filter: glow::NEAREST,
            wrap: glow::REPEAT,
            mipmaps: false,
        }
    }
}

/// Picks the upload format matching the decoder's channel count.
///
/// Anything that is not 4-channel gets expanded or collapsed to RGB by the
/// caller before upload.
pub fn upload_format(channels: u8) -> u32 {
    if channels == 4 { glow::RGBA } else { glow::RGB }
}

/// Represents a handle to a texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub NonZero<u32>);

impl TextureHandle {
    /// Binds the texture handle to the specified texture unit.
    pub fn bind(&self, gl: &glow::Context, unit: u32) {
        unsafe {
            gl.active_texture(glow::TEXTURE0 + unit);
            gl.bind_texture(glow::TEXTURE_2D, Some(glow::NativeTexture(self.0)));
        }
    }
}

/// Represents a texture stored on the GPU side.
pub struct Texture {
    gl: Arc<glow::Context>,
    id: glow::Texture,
    width: u32,
    height: u32,
}

impl Texture {
    /// Allocates a texture object without uploading any image data.
    ///
    /// This is the state a file-backed slot is left in when decoding fails.
    pub fn empty(gl: &Arc<glow::Context>, options: TextureOptions) -> Self {
        unsafe {
            let texture = gl.create_texture().unwrap();
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            apply_options(gl, options);
            gl.bind_texture(glow::TEXTURE_2D, None);

            Self {
                gl: Arc::clone(gl),
                id: texture,
                width: 0,
                height: 0,
            }
        }
    }

    /// Creates a new texture from the given [`image::DynamicImage`].
    ///
    /// The decoder's channel count selects the upload format: 4 channels keep
    /// their alpha, everything else is uploaded as RGB.
    pub fn from_image(
        gl: &Arc<glow::Context>,
        image: &DynamicImage,
        options: TextureOptions,
    ) -> Self {
        let (width, height) = image.dimensions();
        let channels = image.color().channel_count();
        let format = upload_format(channels);
        let data = if format == glow::RGBA {
            image.to_rgba8().into_raw()
        } else {
            image.to_rgb8().into_raw()
        };
        unsafe {
            let texture = gl.create_texture().unwrap();
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                format as i32,
                width as i32,
                height as i32,
                0,
                format,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(data.as_slice())),
            );
            if options.mipmaps {
                gl.generate_mipmap(glow::TEXTURE_2D);
            }
            apply_options(gl, options);
            gl.bind_texture(glow::TEXTURE_2D, None);

            Self {
                gl: Arc::clone(gl),
                id: texture,
                width,
                height,
            }
        }
    }

    /// Creates a new texture from the given raw RGBA data.
    pub fn from_rgba(
        gl: &Arc<glow::Context>,
        width: u32,
        height: u32,
        data: &[u8],
        options: TextureOptions,
    ) -> Self {
        unsafe {
            let texture = gl.create_texture().unwrap();
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA as i32,
                width as i32,
                height as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(data)),
            );
            if options.mipmaps {
                gl.generate_mipmap(glow::TEXTURE_2D);
            }
            apply_options(gl, options);
            gl.bind_texture(glow::TEXTURE_2D, None);

            Self {
                gl: Arc::clone(gl),
                id: texture,
                width,
                height,
            }
        }
    }

    /// Returns the width of the texture.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the texture.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns a handle to the texture.
    pub fn handle(&self) -> TextureHandle {
        TextureHandle(self.id.0)
    }

    /// Binds the texture to the specified texture unit.
    pub fn bind(&self, unit: u32) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(glow::TEXTURE_2D, Some(self.id));
        }
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_texture(self.id);
        }
    }
}

fn apply_options(gl: &glow::Context, options: TextureOptions) {
    unsafe {
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, options.wrap as i32);
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, options.wrap as i32);
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_MIN_FILTER,
            options.min_filter as i32,
        );
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_MAG_FILTER,
            options.mag_filter as i32,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_format_follows_channel_count() {
        assert_eq!(upload_format(4), glow::RGBA);
        assert_eq!(upload_format(3), glow::RGB);
        assert_eq!(upload_format(1), glow::RGB);
    }
}
