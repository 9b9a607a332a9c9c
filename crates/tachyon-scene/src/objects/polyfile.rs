//! Transformed polygon files.

use log::debug;
use tachyon_scene_math::PointTransform;

use crate::error::Result;
use crate::parser::{SceneParser, Source};
use crate::scene::{SceneBuilder, TextureId};

impl<S: SceneBuilder + ?Sized> SceneParser<'_, S> {
    /// Scene syntax: `TPOLYFILE SCALE x y z ROT x y z CENTER x y z FILE name tex`
    ///
    /// The named file holds records of the form `3 x y z x y z x y z`. Each
    /// vertex is scaled, rotated by the Euler angles (degrees) and then
    /// offset by the centre. Reading stops at end of input or at the first
    /// record whose vertex count is not 3.
    pub(crate) fn parse_tpolyfile(&mut self) -> Result<()> {
        let scale = self.keyed_vector("SCALE")?;
        let rotation = self.keyed_vector("ROT")?;
        let center = self.keyed_vector("CENTER")?;
        self.expect("FILE")?;
        let file = self.word("a polygon file name")?;
        let tex = self.texture_ref()?;

        let transform = PointTransform::new(scale, rotation, center);
        let bytes = self.open_sub_file(&file)?;
        self.push_source(Source::new(file.as_str(), bytes));
        let result = self.read_polygons(&transform, tex);
        self.pop_source();

        let count = result?;
        debug!("{}: {} triangles from {}", self.file_name(), count, file);
        Ok(())
    }

    fn read_polygons(&mut self, transform: &PointTransform, tex: TextureId) -> Result<usize> {
        let mut count = 0;
        while let Some(tok) = self.next_token()? {
            if tok.text.parse::<i64>() != Ok(3) {
                debug!(
                    "{}: stopping at `{}`, only triangles are read",
                    self.file_name(),
                    tok.text
                );
                break;
            }
            let v0 = transform.apply(self.vector("a polygon vertex")?);
            let v1 = transform.apply(self.vector("a polygon vertex")?);
            let v2 = transform.apply(self.vector("a polygon vertex")?);
            self.scene.triangle(tex, v1, v0, v2);
            count += 1;
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use approx::assert_relative_eq;
    use tachyon_scene_math::Vec3;

    use crate::error::ErrorKind;
    use crate::options::ParseOptions;
    use crate::parser::parse_scene_source;
    use crate::recording::{RecordingScene, SceneCall};

    /// A polygon file in its own temp directory, removed on drop.
    struct MeshFile {
        dir: PathBuf,
        path: PathBuf,
    }

    impl Drop for MeshFile {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.dir);
        }
    }

    fn scratch(name: &str, contents: &str) -> MeshFile {
        let dir = std::env::temp_dir().join(format!("tpolyfile-{}-{}", std::process::id(), name));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("mesh.poly");
        fs::write(&path, contents).unwrap();
        MeshFile { dir, path }
    }

    fn parse(body: &str) -> (crate::error::Result<()>, RecordingScene) {
        let mut scene = RecordingScene::new();
        let text = format!("BEGIN_SCENE RESOLUTION 8 8\n{body}\nEND_SCENE");
        let result = parse_scene_source("poly.dat", text, &mut scene, &ParseOptions::default());
        (result.map(|_| ()), scene)
    }

    fn triangles(scene: &RecordingScene) -> Vec<[Vec3; 3]> {
        scene
            .calls
            .iter()
            .filter_map(|c| match c {
                SceneCall::Triangle { v0, v1, v2, .. } => Some([*v0, *v1, *v2]),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_identity_swaps_first_two_vertices() {
        let mesh = scratch("identity", "3 0 0 0 1 0 0 0 1 0\n");
        let (result, scene) = parse(&format!(
            "TPOLYFILE SCALE 1 1 1 ROT 0 0 0 CENTER 0 0 0 FILE {} t",
            mesh.path.display()
        ));
        result.unwrap();
        let tris = triangles(&scene);
        assert_eq!(tris.len(), 1);
        assert_eq!(tris[0][0], Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(tris[0][1], Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(tris[0][2], Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_scale_rotate_translate() {
        let mesh = scratch("transform", "3 1 0 0 0 0 0 0 0 1\n");
        let (result, scene) = parse(&format!(
            "TPOLYFILE SCALE 2 2 2 ROT 0 0 90 CENTER 10 0 0 FILE {} t",
            mesh.path.display()
        ));
        result.unwrap();
        let tris = triangles(&scene);
        // (1,0,0) scaled to (2,0,0), turned a quarter about z, then offset.
        assert_relative_eq!(tris[0][1].x, 10.0, epsilon = 1e-5);
        assert_relative_eq!(tris[0][1].y, 2.0, epsilon = 1e-5);
        assert_relative_eq!(tris[0][0].x, 10.0, epsilon = 1e-9);
        assert_relative_eq!(tris[0][2].z, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_stops_at_non_triangle_record() {
        let mesh = scratch(
            "stop",
            "3 0 0 0 1 0 0 0 1 0\n4 0 0 0 1 0 0 1 1 0 0 1 0\n3 0 0 0 1 0 0 0 1 0\n",
        );
        let (result, scene) = parse(&format!(
            "TPOLYFILE SCALE 1 1 1 ROT 0 0 0 CENTER 0 0 0 FILE {} t
             SPHERE CENTER 0 0 0 RAD 1 t",
            mesh.path.display()
        ));
        result.unwrap();
        assert_eq!(triangles(&scene).len(), 1);
        assert!(matches!(scene.calls.last().unwrap(), SceneCall::Sphere { .. }));
    }

    #[test]
    fn test_truncated_record() {
        let mesh = scratch("truncated", "3 0 0 0 1 0 0 0 1\n");
        let (result, _) = parse(&format!(
            "TPOLYFILE SCALE 1 1 1 ROT 0 0 0 CENTER 0 0 0 FILE {} t",
            mesh.path.display()
        ));
        assert_eq!(result.unwrap_err().kind(), ErrorKind::UnexpectedEndOfInput);
    }

    #[test]
    fn test_missing_polygon_file() {
        let (result, scene) = parse(
            "TPOLYFILE SCALE 1 1 1 ROT 0 0 0 CENTER 0 0 0 FILE no-such-mesh.poly t",
        );
        assert_eq!(result.unwrap_err().kind(), ErrorKind::IncludeFileNotFound);
        assert!(triangles(&scene).is_empty());
    }
}
