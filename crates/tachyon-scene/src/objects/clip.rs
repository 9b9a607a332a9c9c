//! Clipping plane groups.

use crate::error::{ParseError, Result};
use crate::parser::SceneParser;
use crate::scene::{ClipPlane, SceneBuilder};

impl<S: SceneBuilder + ?Sized> SceneParser<'_, S> {
    /// Scene syntax: `START_CLIPGROUP NUMPLANES n a b c d ...`
    ///
    /// Planes stay active until the matching `END_CLIPGROUP`, which the
    /// top-level loop turns into `clip_off`.
    pub(crate) fn parse_clip_group(&mut self) -> Result<()> {
        self.expect("NUMPLANES")?;
        let count = self.count("NUMPLANES")?;
        let mut planes: Vec<ClipPlane> = Vec::new();
        planes
            .try_reserve_exact(count)
            .map_err(|_| ParseError::allocation("clip planes", count))?;
        for _ in 0..count {
            planes.push([
                self.float("a clip plane")?,
                self.float("a clip plane")?,
                self.float("a clip plane")?,
                self.float("a clip plane")?,
            ]);
        }
        self.scene.clip_planes(&planes);
        Ok(())
    }
}
