// src/gfx/resources/texture.rs
//! 2D textures decoded from image files.

use std::path::{Path, PathBuf};

use image::DynamicImage;

use super::shader::BoundProgram;
use crate::error::{IrrecoverableError, Result};
use crate::gfx::context::Gfx;
use crate::gfx::device::{PixelFormat, NULL_HANDLE};

/// A 2D texture with mipmaps, linear filtering and repeat wrapping.
///
/// Move-only; the handle is released on drop.
pub struct Texture {
    gfx: Gfx,
    id: u32,
    width: u32,
    height: u32,
    channels: u32,
    file_path: Option<PathBuf>,
}

impl Texture {
    /// Loads and uploads an image file.
    ///
    /// Rows are flipped so the first row is the bottom of the image, as GL
    /// expects. Sources with an alpha channel upload as RGBA, everything else
    /// as RGB.
    ///
    /// # Arguments
    /// * `gfx` - Graphics context to create the texture on
    /// * `path` - Any format the `image` crate decodes
    ///
    /// # Errors
    /// [`IrrecoverableError::Io`] when the file cannot be read and
    /// [`IrrecoverableError::TextureDecode`] when it is not a supported image.
    pub fn from_file(gfx: &Gfx, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| IrrecoverableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let image = image::load_from_memory(&bytes)
            .map_err(|source| IrrecoverableError::TextureDecode {
                path: path.to_path_buf(),
                source,
            })?
            .flipv();

        let mut texture = Self::from_image(gfx, &image)?;
        texture.file_path = Some(path.to_path_buf());
        log::debug!(
            "Loaded texture {} ({}x{}, {} channels)",
            path.display(),
            texture.width,
            texture.height,
            texture.channels
        );
        Ok(texture)
    }

    /// Uploads tightly packed RGB pixels.
    ///
    /// # Arguments
    /// * `width`, `height` - Size in pixels
    /// * `pixels` - Rows bottom to top, 3 bytes per pixel
    ///
    /// # Errors
    /// [`IrrecoverableError::InvalidPixelData`] unless `pixels` holds exactly
    /// `width * height * 3` bytes.
    pub fn from_rgb(gfx: &Gfx, width: u32, height: u32, pixels: &[u8]) -> Result<Self> {
        Self::upload(gfx, width, height, PixelFormat::Rgb8, pixels)
    }

    fn from_image(gfx: &Gfx, image: &DynamicImage) -> Result<Self> {
        if image.color().has_alpha() {
            let rgba = image.to_rgba8();
            Self::upload(gfx, rgba.width(), rgba.height(), PixelFormat::Rgba8, &rgba)
        } else {
            let rgb = image.to_rgb8();
            Self::upload(gfx, rgb.width(), rgb.height(), PixelFormat::Rgb8, &rgb)
        }
    }

    fn upload(
        gfx: &Gfx,
        width: u32,
        height: u32,
        format: PixelFormat,
        pixels: &[u8],
    ) -> Result<Self> {
        let expected = format.byte_len(width, height);
        if expected != Some(pixels.len()) {
            return Err(IrrecoverableError::InvalidPixelData {
                width,
                height,
                expected: expected.unwrap_or(usize::MAX),
                actual: pixels.len(),
            });
        }

        let device = gfx.device();
        let id = device.create_texture()?;
        device.bind_texture_2d(id);
        device.upload_texture_2d(width, height, format, pixels);
        device.bind_texture_2d(NULL_HANDLE);

        Ok(Self {
            gfx: gfx.clone(),
            id,
            width,
            height,
            channels: format.channels(),
            file_path: None,
        })
    }

    /// Binds to texture unit `unit` for the program held by `_program`.
    pub fn bind(&self, _program: &BoundProgram<'_>, unit: u32) {
        let device = self.gfx.device();
        device.active_texture_unit(unit);
        device.bind_texture_2d(self.id);
    }

    /// Points sampler `name` at `unit`. Usually called once after linking.
    pub fn set_init_uniform(program: &mut BoundProgram<'_>, name: &str, unit: i32) {
        program.set_uniform_sampler2d(name, unit);
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u32 {
        self.channels
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn is_valid(&self) -> bool {
        self.id != NULL_HANDLE
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        if self.id != NULL_HANDLE {
            self.gfx.device().delete_texture(self.id);
            self.id = NULL_HANDLE;
        }
    }
}
