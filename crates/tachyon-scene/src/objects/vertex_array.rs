//! Indexed vertex arrays with triangle strips and meshes.
//!
//! Scene syntax:
//!
//! ```text
//! VERTEXARRAY NUMVERTS n
//!   COORDS x y z ...          (n vectors)
//!   NORMALS x y z ...         (n vectors)
//!   [COLORS r g b ...]        (n colours)
//!   [TEXTURE body]
//!   [TRISTRIP k i0 i1 ...]    (k indices, k - 2 triangles)
//!   [TRIMESH f a b c ...]     (f facets)
//!   ...
//! END_VERTEXARRAY
//! ```
//!
//! Blocks after `NORMALS` may repeat in any order. Facets are emitted as
//! each index block is read, so a bad index stops the array after the facets
//! that preceded it.

use log::{debug, error};
use tachyon_scene_math::{Color, Vec3};

use crate::error::{ParseError, Result};
use crate::parser::SceneParser;
use crate::scene::{ColoredVertex, SceneBuilder, TextureId};

/// Positions within a strip's index list used by triangle `t`.
///
/// Odd triangles swap their first two vertices so the whole strip keeps
/// one winding.
pub fn strip_triangle(t: usize) -> [usize; 3] {
    if t % 2 == 0 {
        [t, t + 1, t + 2]
    } else {
        [t + 1, t, t + 2]
    }
}

struct VertexArray {
    coords: Vec<Vec3>,
    normals: Vec<Vec3>,
    colors: Option<Vec<Color>>,
}

/// Texture applied to emitted facets.
///
/// With per-vertex colours, each facet gets a copy of the texture except the
/// first one after a `TEXTURE` block, which uses it directly.
struct FacetTexture {
    current: TextureId,
    uses: usize,
}

impl<S: SceneBuilder + ?Sized> SceneParser<'_, S> {
    /// Scene syntax: see the module documentation.
    pub(crate) fn parse_vertex_array(&mut self) -> Result<()> {
        self.expect("NUMVERTS")?;
        let count = self.count("NUMVERTS")?;
        self.expect("COORDS")?;
        let coords = self.vector_block(count, "COORDS")?;
        self.expect("NORMALS")?;
        let normals = self.vector_block(count, "NORMALS")?;

        let mut array = VertexArray {
            coords,
            normals,
            colors: None,
        };
        let mut texture = FacetTexture {
            current: self.textures.default_texture(),
            uses: 1,
        };

        loop {
            let tok = self.token("END_VERTEXARRAY")?;
            match tok.text.to_ascii_uppercase().as_str() {
                "COLORS" => array.colors = Some(self.color_block(count)?),
                "TEXTURE" => {
                    texture.current = self.texture_body()?;
                    texture.uses = 0;
                }
                "TRISTRIP" => {
                    let len = self.count("TRISTRIP")?;
                    let indices = self.index_block(len, "TRISTRIP")?;
                    for t in 0..len.saturating_sub(2) {
                        let facet = strip_triangle(t).map(|i| indices[i]);
                        self.emit_facet(&array, &mut texture, "TRISTRIP", t, facet)?;
                    }
                }
                "TRIMESH" => {
                    let facets = self.count("TRIMESH")?;
                    let len = facets
                        .checked_mul(3)
                        .ok_or_else(|| ParseError::allocation("TRIMESH indices", usize::MAX))?;
                    let indices = self.index_block(len, "TRIMESH")?;
                    for (f, chunk) in indices.chunks_exact(3).enumerate() {
                        let facet = [chunk[0], chunk[1], chunk[2]];
                        self.emit_facet(&array, &mut texture, "TRIMESH", f, facet)?;
                    }
                }
                "END_VERTEXARRAY" => {
                    debug!(
                        "{}: vertex array of {} vertices done",
                        self.file_name(),
                        count
                    );
                    return Ok(());
                }
                _ => return Err(self.syntax_error("a vertex array block", &tok)),
            }
        }
    }

    fn emit_facet(
        &mut self,
        array: &VertexArray,
        texture: &mut FacetTexture,
        block: &'static str,
        facet: usize,
        indices: [i64; 3],
    ) -> Result<()> {
        let vertex_count = array.coords.len();
        let mut resolved = [0usize; 3];
        for (slot, &index) in resolved.iter_mut().zip(indices.iter()) {
            match usize::try_from(index) {
                Ok(i) if i < vertex_count => *slot = i,
                _ => {
                    let line = self.line();
                    error!(
                        "{}: {} facet {} uses vertex {} of {} (line {})",
                        self.file_name(),
                        block,
                        facet,
                        index,
                        vertex_count,
                        line
                    );
                    return Err(ParseError::InvalidVertexIndex {
                        file: self.file_name().to_string(),
                        line,
                        block,
                        facet,
                        index,
                        vertex_count,
                    });
                }
            }
        }

        let points = resolved.map(|i| array.coords[i]);
        let normals = resolved.map(|i| array.normals[i]);
        match &array.colors {
            Some(colors) => {
                if texture.uses > 0 {
                    texture.current = self.scene.texture_copy_vcstri(texture.current);
                }
                let vertices = [0, 1, 2].map(|k| ColoredVertex {
                    point: points[k],
                    normal: normals[k],
                    color: colors[resolved[k]],
                });
                self.scene.vcstri(texture.current, vertices);
            }
            None => self.scene.smooth_triangle(texture.current, points, normals),
        }
        texture.uses += 1;
        Ok(())
    }

    fn vector_block(&mut self, count: usize, block: &str) -> Result<Vec<Vec3>> {
        let mut out = Vec::new();
        out.try_reserve_exact(count)
            .map_err(|_| ParseError::allocation(format!("vertex array {block}"), count))?;
        for _ in 0..count {
            out.push(self.vector(block)?);
        }
        Ok(out)
    }

    fn color_block(&mut self, count: usize) -> Result<Vec<Color>> {
        let mut out = Vec::new();
        out.try_reserve_exact(count)
            .map_err(|_| ParseError::allocation("vertex array COLORS", count))?;
        for _ in 0..count {
            out.push(self.color("COLORS")?);
        }
        Ok(out)
    }

    fn index_block(&mut self, count: usize, block: &str) -> Result<Vec<i64>> {
        let mut out = Vec::new();
        out.try_reserve_exact(count)
            .map_err(|_| ParseError::allocation(format!("{block} indices"), count))?;
        for _ in 0..count {
            out.push(self.int(block)?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::options::ParseOptions;
    use crate::parser::parse_scene_source;
    use crate::recording::{RecordingScene, SceneCall};

    const QUAD: &str = "VERTEXARRAY NUMVERTS 4
        COORDS 0 0 0  1 0 0  0 1 0  1 1 0
        NORMALS 0 0 1  0 0 1  0 0 1  0 0 1";

    const PLAIN: &str = "AMBIENT 0.1 DIFFUSE 0.9 SPECULAR 0 OPACITY 1 COLOR 1 1 1 TEXFUNC 0";

    fn parse(body: &str) -> (crate::error::Result<()>, RecordingScene) {
        let mut scene = RecordingScene::new();
        let text = format!("BEGIN_SCENE RESOLUTION 8 8\n{body}\nEND_SCENE");
        let result = parse_scene_source("va.dat", text, &mut scene, &ParseOptions::default());
        (result.map(|_| ()), scene)
    }

    fn triangles(scene: &RecordingScene) -> Vec<[Vec3; 3]> {
        scene
            .calls
            .iter()
            .filter_map(|c| match c {
                SceneCall::SmoothTriangle { vertices, .. } => Some(*vertices),
                SceneCall::Vcstri { vertices, .. } => Some(vertices.map(|v| v.point)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_strip_pattern() {
        assert_eq!(strip_triangle(0), [0, 1, 2]);
        assert_eq!(strip_triangle(1), [2, 1, 3]);
        assert_eq!(strip_triangle(2), [2, 3, 4]);
        assert_eq!(strip_triangle(3), [4, 3, 5]);
    }

    #[test]
    fn test_tristrip_winding() {
        let (result, scene) = parse(&format!("{QUAD} TRISTRIP 4 0 1 2 3 END_VERTEXARRAY"));
        result.unwrap();
        let tris = triangles(&scene);
        assert_eq!(tris.len(), 2);
        let v = |x: f64, y: f64| Vec3::new(x, y, 0.0);
        assert_eq!(tris[0], [v(0.0, 0.0), v(1.0, 0.0), v(0.0, 1.0)]);
        assert_eq!(tris[1], [v(0.0, 1.0), v(1.0, 0.0), v(1.0, 1.0)]);
    }

    #[test]
    fn test_short_strip_emits_nothing() {
        let (result, scene) = parse(&format!("{QUAD} TRISTRIP 2 0 1 END_VERTEXARRAY"));
        result.unwrap();
        assert!(triangles(&scene).is_empty());
    }

    #[test]
    fn test_trimesh() {
        let (result, scene) = parse(&format!("{QUAD} TRIMESH 2 0 1 2 2 1 3 END_VERTEXARRAY"));
        result.unwrap();
        assert_eq!(triangles(&scene).len(), 2);
    }

    #[test]
    fn test_invalid_index_aborts() {
        let (result, scene) = parse(&format!(
            "{QUAD} TRIMESH 3 0 1 2 0 1 4 1 2 3 END_VERTEXARRAY"
        ));
        match result.unwrap_err() {
            ParseError::InvalidVertexIndex {
                block,
                facet,
                index,
                vertex_count,
                ..
            } => {
                assert_eq!(block, "TRIMESH");
                assert_eq!(facet, 1);
                assert_eq!(index, 4);
                assert_eq!(vertex_count, 4);
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(triangles(&scene).len(), 1);
    }

    #[test]
    fn test_negative_index() {
        let (result, _) = parse(&format!("{QUAD} TRISTRIP 3 0 -1 2 END_VERTEXARRAY"));
        assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidVertexIndex);
    }

    #[test]
    fn test_missing_normals() {
        let (result, _) = parse(
            "VERTEXARRAY NUMVERTS 1 COORDS 0 0 0 COLORS 1 1 1 END_VERTEXARRAY",
        );
        assert_eq!(result.unwrap_err().kind(), ErrorKind::SyntaxError);
    }

    #[test]
    fn test_colors_use_vertex_colored_triangles() {
        let (result, scene) = parse(&format!(
            "{QUAD} COLORS 1 0 0  0 1 0  0 0 1  1 1 1 TRISTRIP 3 0 1 2 END_VERTEXARRAY"
        ));
        result.unwrap();
        let SceneCall::Vcstri { vertices, .. } = scene.calls.last().unwrap() else {
            panic!("expected a vertex-coloured triangle");
        };
        assert_eq!(vertices[2].color, Color::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_texture_copies_after_redefinition() {
        let (result, scene) = parse(&format!(
            "{QUAD} COLORS 1 0 0  0 1 0  0 0 1  1 1 1
             TEXTURE {PLAIN}
             TRIMESH 3 0 1 2 2 1 3 0 1 3
             END_VERTEXARRAY"
        ));
        result.unwrap();
        let copies = scene
            .calls
            .iter()
            .filter(|c| matches!(c, SceneCall::TextureCopyVcstri { .. }))
            .count();
        assert_eq!(copies, 2);

        let used: Vec<TextureId> = scene
            .calls
            .iter()
            .filter_map(|c| match c {
                SceneCall::Vcstri { tex, .. } => Some(*tex),
                _ => None,
            })
            .collect();
        assert_eq!(used[0], TextureId(1));
        assert_ne!(used[1], used[0]);
        assert_ne!(used[2], used[1]);
    }

    #[test]
    fn test_default_texture_is_copied_for_colors() {
        let (result, scene) = parse(&format!(
            "{QUAD} COLORS 1 0 0  0 1 0  0 0 1  1 1 1 TRISTRIP 3 0 1 2 END_VERTEXARRAY"
        ));
        result.unwrap();
        assert!(scene.calls.contains(&SceneCall::TextureCopyVcstri {
            tex: TextureId(0),
            copy: TextureId(1)
        }));
    }

    #[test]
    fn test_plain_arrays_share_texture() {
        let (result, scene) = parse(&format!(
            "{QUAD} TEXTURE {PLAIN} TRISTRIP 4 0 1 2 3 END_VERTEXARRAY"
        ));
        result.unwrap();
        assert!(!scene
            .calls
            .iter()
            .any(|c| matches!(c, SceneCall::TextureCopyVcstri { .. })));
        assert!(scene
            .calls
            .iter()
            .filter(|c| matches!(c, SceneCall::SmoothTriangle { .. }))
            .all(|c| matches!(c, SceneCall::SmoothTriangle { tex: TextureId(1), .. })));
    }

    #[test]
    fn test_unknown_block() {
        let (result, _) = parse(&format!("{QUAD} TEXCOORDS2 0 0 END_VERTEXARRAY"));
        assert_eq!(result.unwrap_err().kind(), ErrorKind::SyntaxError);
    }
}
