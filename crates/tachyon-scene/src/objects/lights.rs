//! Point, directional, spot and sky lights.

use log::error;
use tachyon_scene_math::Color;

use crate::error::{ParseError, Result};
use crate::parser::SceneParser;
use crate::scene::{Attenuation, SceneBuilder, TextureDesc, TextureId};

/// Trailing block shared by every emitting light.
///
/// Scene syntax: `COLOR r g b` or
/// `ATTENUATION CONSTANT c LINEAR l QUADRATIC q COLOR r g b`
struct LightTail {
    color: Color,
    attenuation: Option<Attenuation>,
}

impl<S: SceneBuilder + ?Sized> SceneParser<'_, S> {
    fn light_tail(&mut self) -> Result<LightTail> {
        let tok = self.token("COLOR or ATTENUATION")?;
        if tok.is("COLOR") {
            return Ok(LightTail {
                color: self.color("COLOR")?,
                attenuation: None,
            });
        }
        if !tok.is("ATTENUATION") {
            let line = self.line();
            error!(
                "{}: expected COLOR or ATTENUATION after light, found `{}` (line {})",
                self.file_name(),
                tok.text,
                line
            );
            return Err(ParseError::BadAttenuationOrColorBlock {
                file: self.file_name().to_string(),
                line,
                found: tok.text,
            });
        }

        let attenuation = Attenuation {
            constant: self.keyed_float("CONSTANT")?,
            linear: self.keyed_float("LINEAR")?,
            quadratic: self.keyed_float("QUADRATIC")?,
        };
        Ok(LightTail {
            color: self.keyed_color("COLOR")?,
            attenuation: Some(attenuation),
        })
    }

    /// Light textures carry only a colour.
    fn light_texture(&mut self, color: Color) -> TextureId {
        self.scene.texture(&TextureDesc::light(color))
    }

    /// Scene syntax: `LIGHT CENTER x y z RAD r tail`
    pub(crate) fn parse_light(&mut self) -> Result<()> {
        let center = self.keyed_vector("CENTER")?;
        let radius = self.keyed_float("RAD")?;
        let tail = self.light_tail()?;

        let tex = self.light_texture(tail.color);
        let light = self.scene.light(tex, center, radius);
        if let Some(attenuation) = tail.attenuation {
            self.scene.light_attenuation(light, attenuation);
        }
        Ok(())
    }

    /// Scene syntax: `DIRECTIONAL_LIGHT DIRECTION x y z tail`
    pub(crate) fn parse_directional_light(&mut self) -> Result<()> {
        let direction = self.keyed_vector("DIRECTION")?;
        let tail = self.light_tail()?;

        let tex = self.light_texture(tail.color);
        let light = self.scene.directional_light(tex, direction);
        if let Some(attenuation) = tail.attenuation {
            self.scene.light_attenuation(light, attenuation);
        }
        Ok(())
    }

    /// Scene syntax: `SPOTLIGHT CENTER x y z RAD r DIRECTION x y z
    /// FALLOFF_START a FALLOFF_END b tail`
    pub(crate) fn parse_spotlight(&mut self) -> Result<()> {
        let center = self.keyed_vector("CENTER")?;
        let radius = self.keyed_float("RAD")?;
        let direction = self.keyed_vector("DIRECTION")?;
        let falloff_start = self.keyed_float("FALLOFF_START")?;
        let falloff_end = self.keyed_float("FALLOFF_END")?;
        let tail = self.light_tail()?;

        let tex = self.light_texture(tail.color);
        let light = self
            .scene
            .spotlight(tex, center, radius, direction, falloff_start, falloff_end);
        if let Some(attenuation) = tail.attenuation {
            self.scene.light_attenuation(light, attenuation);
        }
        Ok(())
    }

    /// Scene syntax: `SKY_LIGHT NUMSAMPLES n COLOR r g b`
    pub(crate) fn parse_sky_light(&mut self) -> Result<()> {
        self.expect("NUMSAMPLES")?;
        let samples = self.i32("NUMSAMPLES")?;
        let ambient = self.keyed_color("COLOR")?;
        self.scene.ambient_occlusion(samples, ambient);
        Ok(())
    }
}
