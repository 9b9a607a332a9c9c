//! Texture bodies, named textures and inline images.

use log::{debug, warn};
use tachyon_scene_math::Color;

use crate::error::{ParseError, Result};
use crate::lexer::Token;
use crate::parser::SceneParser;
use crate::scene::{
    Outline, Phong, PhongKind, SceneBuilder, TextureDesc, TextureFunction, TextureId, TransMode,
};

/// How a texture body ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyMode {
    /// `COLOR r g b TEXFUNC n ...`
    Standard,
    /// `VCST`; colour comes from the vertices.
    VertexColor,
}

/// Decode an `RRGGBB`-style hex colour to 8-bit channels.
///
/// Tokens of 3, 6, 9 or 12 digits carry 4, 8, 12 or 16 bits per channel.
/// Four-bit channels are replicated into both nibbles; wider channels keep
/// their high eight bits.
pub fn decode_hex_color(text: &str) -> Option<[u8; 3]> {
    let digits = match text.len() {
        3 | 6 | 9 | 12 => text.len() / 3,
        _ => return None,
    };
    if !text.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let mut rgb = [0u8; 3];
    for (channel, chunk) in rgb.iter_mut().zip(text.as_bytes().chunks(digits)) {
        let chunk = std::str::from_utf8(chunk).ok()?;
        let value = u16::from_str_radix(chunk, 16).ok()?;
        let widened = match digits {
            1 => value | (value << 4),
            2 => value,
            3 => value >> 4,
            _ => value >> 8,
        };
        *channel = (widened & 0xff) as u8;
    }
    Some(rgb)
}

impl<S: SceneBuilder + ?Sized> SceneParser<'_, S> {
    /// Parse a texture body and create the texture.
    ///
    /// Scene syntax: `AMBIENT a DIFFUSE d SPECULAR s OPACITY o [TRANSMODE m]
    /// [OUTLINE w OUTLINE_WIDTH w] [PHONG kind p PHONG_SIZE e] COLOR r g b
    /// TEXFUNC n ...`
    pub(crate) fn texture_body(&mut self) -> Result<TextureId> {
        self.texture_body_in(BodyMode::Standard)
    }

    /// Texture body for per-vertex-coloured triangles, ending in `VCST`.
    pub(crate) fn vertex_color_texture_body(&mut self) -> Result<TextureId> {
        self.texture_body_in(BodyMode::VertexColor)
    }

    fn texture_body_in(&mut self, mode: BodyMode) -> Result<TextureId> {
        let mut desc = TextureDesc {
            ambient: self.keyed_float("AMBIENT")? as f32,
            diffuse: self.keyed_float("DIFFUSE")? as f32,
            specular: self.keyed_float("SPECULAR")? as f32,
            opacity: self.keyed_float("OPACITY")? as f32,
            ..TextureDesc::default()
        };

        let mut trans_mode = TransMode::ORIG;
        let mut outline = Outline::default();
        let mut phong = Phong::default();

        let mut tok = self.token("COLOR")?;
        if tok.is("TRANSMODE") {
            if self.token("a transparency mode")?.is("R3D") {
                trans_mode = TransMode::RASTER3D;
            }
            tok = self.token("COLOR")?;
        }
        if tok.is("OUTLINE") {
            outline.outline = self.f32("OUTLINE")?;
            outline.width = self.keyed_float("OUTLINE_WIDTH")? as f32;
            tok = self.token("COLOR")?;
        }
        if tok.is("PHONG") {
            if self.token("a phong kind")?.is("METAL") {
                phong.kind = PhongKind::Metal;
            }
            phong.level = self.f32("PHONG")?;
            phong.exponent = self.keyed_float("PHONG_SIZE")? as f32;
            tok = self.token("COLOR")?;
        }

        match mode {
            BodyMode::Standard => {
                if !tok.is("COLOR") {
                    return Err(self.syntax_error("COLOR", &tok));
                }
                desc.color = self.color("COLOR")?;
                self.expect("TEXFUNC")?;
                let code = self.int("TEXFUNC")?;
                desc.function = TextureFunction::from_code(code).unwrap_or_else(|| {
                    warn!(
                        "{}: unknown texture function {}, using constant",
                        self.file_name(),
                        code
                    );
                    TextureFunction::Constant
                });
                self.texture_function_tail(&mut desc)?;
            }
            BodyMode::VertexColor => {
                if !tok.is("VCST") {
                    return Err(self.syntax_error("VCST", &tok));
                }
                desc.color = Color::WHITE;
            }
        }

        let tex = self.scene.texture(&desc);
        self.scene.texture_phong(tex, phong);
        self.scene.texture_trans_mode(tex, trans_mode);
        self.scene.texture_outline(tex, outline);
        Ok(tex)
    }

    fn texture_function_tail(&mut self, desc: &mut TextureDesc) -> Result<()> {
        use TextureFunction::*;

        if desc.function == Constant {
            return Ok(());
        }
        if desc.function.uses_image() {
            desc.image = Some(self.word("an image name")?);
        }

        let mapping = &mut desc.mapping;
        mapping.center = self.keyed_vector("CENTER")?;
        mapping.rotate = self.keyed_vector("ROTATE")?;
        mapping.scale = self.keyed_vector("SCALE")?;

        if matches!(desc.function, PlanarImage | VolumeImage) {
            mapping.uaxis = self.keyed_vector("UAXIS")?;
            mapping.vaxis = self.keyed_vector("VAXIS")?;
        }
        if desc.function == VolumeImage {
            mapping.waxis = self.keyed_vector("WAXIS")?;
        }
        Ok(())
    }

    /// Scene syntax: `TEXDEF name body`
    pub(crate) fn parse_tex_def(&mut self) -> Result<()> {
        let name = self.word("a texture name")?;
        let tex = self.texture_body()?;
        if let Err(err) = self.textures.define(&name, tex) {
            debug!("{}: {}", self.file_name(), err);
        }
        Ok(())
    }

    /// Scene syntax: `TEXALIAS new existing`
    pub(crate) fn parse_tex_alias(&mut self) -> Result<()> {
        let alias = self.word("a texture name")?;
        let existing = self.word("a texture name")?;
        if let Err(err) = self.textures.alias(&alias, &existing) {
            debug!("{}: {}", self.file_name(), err);
        }
        Ok(())
    }

    /// Scene syntax: `IMAGEDEF name FORMAT RGB24 RESOLUTION x y z ENCODING HEX rgb...`
    ///
    /// Voxels run depth, then row, then column. Every voxel is read even
    /// after a bad one so the stream stays aligned; the first bad token is
    /// reported once the image is complete.
    pub(crate) fn parse_image_def(&mut self) -> Result<()> {
        let name = self.word("an image name")?;
        self.expect("FORMAT")?;
        self.expect("RGB24")?;
        self.expect("RESOLUTION")?;
        let xres = self.count("image width")?;
        let yres = self.count("image height")?;
        let zres = self.count("image depth")?;
        self.expect("ENCODING")?;
        self.expect("HEX")?;

        let voxels = xres
            .checked_mul(yres)
            .and_then(|n| n.checked_mul(zres))
            .ok_or_else(|| ParseError::allocation(format!("image {name}"), usize::MAX))?;
        let bytes = voxels
            .checked_mul(3)
            .ok_or_else(|| ParseError::allocation(format!("image {name}"), usize::MAX))?;
        let mut rgb = Vec::new();
        rgb.try_reserve_exact(bytes)
            .map_err(|_| ParseError::allocation(format!("image {name}"), bytes))?;

        let mut first_bad: Option<Token> = None;
        for _ in 0..voxels {
            let tok = self.token("a hex colour")?;
            match decode_hex_color(&tok.text) {
                Some(pixel) => rgb.extend_from_slice(&pixel),
                None => {
                    rgb.extend_from_slice(&[0, 0, 0]);
                    first_bad.get_or_insert(tok);
                }
            }
        }

        if let Some(bad) = first_bad {
            return Err(self.syntax_error("a 3, 6, 9 or 12 digit hex colour", &bad));
        }
        debug!("{}: image {} is {}x{}x{}", self.file_name(), name, xres, yres, zres);
        self.scene.define_teximage_rgb24(&name, xres, yres, zres, rgb);
        Ok(())
    }
}
