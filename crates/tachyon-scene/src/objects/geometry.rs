//! Geometric primitives.

use crate::error::{ParseError, Result};
use crate::parser::SceneParser;
use crate::scene::{ColoredVertex, SceneBuilder};

impl<S: SceneBuilder + ?Sized> SceneParser<'_, S> {
    /// Scene syntax: `SPHERE CENTER x y z RAD r tex`
    pub(crate) fn parse_sphere(&mut self) -> Result<()> {
        let center = self.keyed_vector("CENTER")?;
        let radius = self.keyed_float("RAD")?;
        let tex = self.texture_ref()?;
        self.scene.sphere(tex, center, radius);
        Ok(())
    }

    /// Scene syntax: `PLANE CENTER x y z NORMAL x y z tex`
    pub(crate) fn parse_plane(&mut self) -> Result<()> {
        let center = self.keyed_vector("CENTER")?;
        let normal = self.keyed_vector("NORMAL")?;
        let tex = self.texture_ref()?;
        self.scene.plane(tex, center, normal);
        Ok(())
    }

    /// Scene syntax: `BOX MIN x y z MAX x y z tex`
    pub(crate) fn parse_box(&mut self) -> Result<()> {
        let min = self.keyed_vector("MIN")?;
        let max = self.keyed_vector("MAX")?;
        let tex = self.texture_ref()?;
        self.scene.axis_box(tex, min, max);
        Ok(())
    }

    /// Scene syntax: `RING CENTER x y z NORMAL x y z INNER r OUTER r tex`
    pub(crate) fn parse_ring(&mut self) -> Result<()> {
        let center = self.keyed_vector("CENTER")?;
        let normal = self.keyed_vector("NORMAL")?;
        let inner = self.keyed_float("INNER")?;
        let outer = self.keyed_float("OUTER")?;
        let tex = self.texture_ref()?;
        self.scene.ring(tex, center, normal, inner, outer);
        Ok(())
    }

    /// Scene syntax: `CYLINDER CENTER x y z AXIS x y z RAD r tex`
    pub(crate) fn parse_cylinder(&mut self) -> Result<()> {
        let center = self.keyed_vector("CENTER")?;
        let axis = self.keyed_vector("AXIS")?;
        let radius = self.keyed_float("RAD")?;
        let tex = self.texture_ref()?;
        self.scene.cylinder(tex, center, axis, radius);
        Ok(())
    }

    /// Scene syntax: `FCYLINDER BASE x y z APEX x y z RAD r tex`
    ///
    /// The cylinder axis runs from base to apex.
    pub(crate) fn parse_fcylinder(&mut self) -> Result<()> {
        let base = self.keyed_vector("BASE")?;
        let apex = self.keyed_vector("APEX")?;
        let radius = self.keyed_float("RAD")?;
        let tex = self.texture_ref()?;
        self.scene.fcylinder(tex, base, apex - base, radius);
        Ok(())
    }

    /// Scene syntax: `POLYCYLINDER POINTS n x y z ... RAD r tex`
    pub(crate) fn parse_polycylinder(&mut self) -> Result<()> {
        self.expect("POINTS")?;
        let count = self.count("POINTS")?;
        let mut points = Vec::new();
        points
            .try_reserve_exact(count)
            .map_err(|_| ParseError::allocation("polycylinder points", count))?;
        for _ in 0..count {
            points.push(self.vector("a polycylinder point")?);
        }
        let radius = self.keyed_float("RAD")?;
        let tex = self.texture_ref()?;
        self.scene.polycylinder(tex, &points, radius);
        Ok(())
    }

    /// Scene syntax: `TRI V0 x y z V1 x y z V2 x y z tex`
    pub(crate) fn parse_tri(&mut self) -> Result<()> {
        let v0 = self.keyed_vector("V0")?;
        let v1 = self.keyed_vector("V1")?;
        let v2 = self.keyed_vector("V2")?;
        let tex = self.texture_ref()?;
        self.scene.triangle(tex, v0, v1, v2);
        Ok(())
    }

    /// Scene syntax: `STRI V0 .. V1 .. V2 .. N0 .. N1 .. N2 .. tex`
    pub(crate) fn parse_stri(&mut self) -> Result<()> {
        let vertices = [
            self.keyed_vector("V0")?,
            self.keyed_vector("V1")?,
            self.keyed_vector("V2")?,
        ];
        let normals = [
            self.keyed_vector("N0")?,
            self.keyed_vector("N1")?,
            self.keyed_vector("N2")?,
        ];
        let tex = self.texture_ref()?;
        self.scene.smooth_triangle(tex, vertices, normals);
        Ok(())
    }

    /// Scene syntax: `VCSTRI V0 .. V1 .. V2 .. N0 .. N1 .. N2 .. C0 r g b
    /// C1 r g b C2 r g b body VCST`
    ///
    /// The texture is always an inline body; its colour is unused.
    pub(crate) fn parse_vcstri(&mut self) -> Result<()> {
        let points = [
            self.keyed_vector("V0")?,
            self.keyed_vector("V1")?,
            self.keyed_vector("V2")?,
        ];
        let normals = [
            self.keyed_vector("N0")?,
            self.keyed_vector("N1")?,
            self.keyed_vector("N2")?,
        ];
        let colors = [
            self.keyed_color("C0")?,
            self.keyed_color("C1")?,
            self.keyed_color("C2")?,
        ];
        let tex = self.vertex_color_texture_body()?;

        let vertices = [0, 1, 2].map(|i| ColoredVertex {
            point: points[i],
            normal: normals[i],
            color: colors[i],
        });
        self.scene.vcstri(tex, vertices);
        Ok(())
    }

    /// Scene syntax: `SCAPE RES m n SCALE wx wy CENTER x y z tex`
    pub(crate) fn parse_landscape(&mut self) -> Result<()> {
        self.expect("RES")?;
        let m = self.count("RES")?;
        let n = self.count("RES")?;
        self.expect("SCALE")?;
        let wx = self.float("SCALE")?;
        let wy = self.float("SCALE")?;
        let center = self.keyed_vector("CENTER")?;
        let tex = self.texture_ref()?;
        self.scene.landscape(tex, m, n, center, wx, wy);
        Ok(())
    }

    /// Scene syntax: `SCALARVOL MIN x y z MAX x y z DIM x y z FILE name tex`
    pub(crate) fn parse_scalar_volume(&mut self) -> Result<()> {
        let min = self.keyed_vector("MIN")?;
        let max = self.keyed_vector("MAX")?;
        self.expect("DIM")?;
        let dims = [self.count("DIM")?, self.count("DIM")?, self.count("DIM")?];
        self.expect("FILE")?;
        let file = self.word("a volume file name")?;
        let tex = self.texture_ref()?;
        self.scene.scalar_volume(tex, min, max, dims, &file);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ErrorKind;
    use crate::options::ParseOptions;
    use crate::parser::parse_scene_source;
    use crate::recording::{RecordingScene, SceneCall};
    use crate::scene::TextureId;
    use tachyon_scene_math::{Color, Vec3};

    fn parse(body: &str) -> (crate::error::Result<()>, RecordingScene) {
        let mut scene = RecordingScene::new();
        let text = format!("BEGIN_SCENE RESOLUTION 8 8\n{body}\nEND_SCENE");
        let result = parse_scene_source("geom.dat", text, &mut scene, &ParseOptions::default());
        (result.map(|_| ()), scene)
    }

    fn last(scene: &RecordingScene) -> &SceneCall {
        scene.calls.last().unwrap()
    }

    #[test]
    fn test_sphere_with_named_texture() {
        let (result, scene) = parse("SPHERE CENTER 1 2 3 RAD 0.5 nothing");
        result.unwrap();
        assert_eq!(
            last(&scene),
            &SceneCall::Sphere {
                tex: TextureId(0),
                center: Vec3::new(1.0, 2.0, 3.0),
                radius: 0.5
            }
        );
    }

    #[test]
    fn test_fcylinder_axis_is_apex_minus_base() {
        let (result, scene) = parse("FCYLINDER BASE 1 1 1 APEX 1 4 1 RAD 0.25 t");
        result.unwrap();
        let SceneCall::Fcylinder { base, axis, .. } = last(&scene) else {
            panic!("expected a capped cylinder");
        };
        assert_eq!(*base, Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(*axis, Vec3::new(0.0, 3.0, 0.0));
    }

    #[test]
    fn test_polycylinder() {
        let (result, scene) = parse("POLYCYLINDER POINTS 3 0 0 0 1 0 0 1 1 0 RAD 0.1 t");
        result.unwrap();
        let SceneCall::Polycylinder { points, radius, .. } = last(&scene) else {
            panic!("expected a polycylinder");
        };
        assert_eq!(points.len(), 3);
        assert_eq!(points[2], Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(*radius, 0.1);
    }

    #[test]
    fn test_ring_and_box() {
        let (result, scene) = parse(
            "RING CENTER 0 0 0 NORMAL 0 0 1 INNER 0.5 OUTER 1 t
             BOX MIN -1 -1 -1 MAX 1 1 1 t",
        );
        result.unwrap();
        assert!(matches!(
            &scene.calls[scene.calls.len() - 2],
            SceneCall::Ring { inner, outer, .. } if *inner == 0.5 && *outer == 1.0
        ));
        assert!(matches!(last(&scene), SceneCall::Box { .. }));
    }

    #[test]
    fn test_fields_out_of_order() {
        let (result, scene) = parse("PLANE NORMAL 0 0 1 CENTER 0 0 0 t");
        assert_eq!(result.unwrap_err().kind(), ErrorKind::SyntaxError);
        assert_eq!(scene.object_count(), 0);
    }

    #[test]
    fn test_truncated_vector() {
        let (result, _) = parse("TRI V0 0 0 0 V1 1 0 0 V2 0 1");
        // END_SCENE lands where the last coordinate should be.
        assert_eq!(result.unwrap_err().kind(), ErrorKind::SyntaxError);
    }

    #[test]
    fn test_stri_order() {
        let (result, scene) = parse(
            "STRI V0 0 0 0 V1 1 0 0 V2 0 1 0 N0 0 0 1 N1 0 0 1 N2 0 0 -1 t",
        );
        result.unwrap();
        let SceneCall::SmoothTriangle { vertices, normals, .. } = last(&scene) else {
            panic!("expected a smooth triangle");
        };
        assert_eq!(vertices[1], Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(normals[2], Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_vcstri_uses_vertex_color_body() {
        let (result, scene) = parse(
            "VCSTRI V0 0 0 0 V1 1 0 0 V2 0 1 0 N0 0 0 1 N1 0 0 1 N2 0 0 1
             C0 1 0 0 C1 0 1 0 C2 0 0 1
             AMBIENT 0.1 DIFFUSE 0.9 SPECULAR 0 OPACITY 1 VCST",
        );
        result.unwrap();
        let SceneCall::Vcstri { tex, vertices } = last(&scene) else {
            panic!("expected a vertex-coloured triangle");
        };
        assert_eq!(vertices[1].color, Color::new(0.0, 1.0, 0.0));
        assert_eq!(scene.texture_desc(*tex).unwrap().color, Color::WHITE);
    }

    #[test]
    fn test_landscape_and_volume() {
        let (result, scene) = parse(
            "SCAPE RES 64 32 SCALE 10 5 CENTER 0 0 0 t
             SCALARVOL MIN 0 0 0 MAX 1 1 1 DIM 8 8 8 FILE density.raw t",
        );
        result.unwrap();
        assert!(scene.calls.iter().any(|c| matches!(
            c,
            SceneCall::Landscape { m: 64, n: 32, wx, .. } if *wx == 10.0
        )));
        assert!(matches!(
            last(&scene),
            SceneCall::ScalarVolume { dims: [8, 8, 8], file, .. } if file == "density.raw"
        ));
    }
}
