//! Camera, shader mode, fog and background declarations.

use crate::error::Result;
use crate::parser::SceneParser;
use crate::scene::{
    BackgroundGradient, BackgroundMode, CameraSetup, Fog, FogMode, FogRenderingMode, Projection,
    SceneBuilder, ShaderMode, TransMode,
};

impl<S: SceneBuilder + ?Sized> SceneParser<'_, S> {
    /// Scene syntax: `CAMERA [PROJECTION p] ZOOM z ASPECTRATIO a
    /// ANTIALIASING n RAYDEPTH n CENTER .. VIEWDIR .. UPDIR ..
    /// [FRUSTUM l r b t] END_CAMERA`
    ///
    /// `PERSPECTIVE_DOF` is followed by `FOCALLENGTH f APERTURE a`.
    pub(crate) fn parse_camera(&mut self) -> Result<()> {
        let mut projection = None;
        let mut dof = None;

        let tok = self.token("PROJECTION or ZOOM")?;
        if tok.is("PROJECTION") {
            let kind = self.token("a projection")?;
            let chosen = match kind.text.to_ascii_uppercase().as_str() {
                "FISHEYE" => Projection::Fisheye,
                "PERSPECTIVE" => Projection::Perspective,
                "PERSPECTIVE_DOF" => Projection::PerspectiveDof,
                "ORTHOGRAPHIC" => Projection::Orthographic,
                _ => return Err(self.syntax_error("a camera projection", &kind)),
            };
            if chosen == Projection::PerspectiveDof {
                let focal_length = self.keyed_float("FOCALLENGTH")?;
                let aperture = self.keyed_float("APERTURE")?;
                dof = Some((focal_length, aperture));
            }
            projection = Some(chosen);
            self.expect("ZOOM")?;
        } else if !tok.is("ZOOM") {
            return Err(self.syntax_error("PROJECTION or ZOOM", &tok));
        }

        let zoom = self.float("ZOOM")?;
        let aspect_ratio = self.keyed_float("ASPECTRATIO")?;
        self.expect("ANTIALIASING")?;
        let antialiasing = self.i32("ANTIALIASING")?;
        self.expect("RAYDEPTH")?;
        let ray_depth = self.i32("RAYDEPTH")?;
        let camera = CameraSetup {
            zoom,
            aspect_ratio,
            antialiasing,
            ray_depth,
            center: self.keyed_vector("CENTER")?,
            view_dir: self.keyed_vector("VIEWDIR")?,
            up_dir: self.keyed_vector("UPDIR")?,
        };

        let mut frustum = None;
        let mut tok = self.token("END_CAMERA")?;
        if tok.is("FRUSTUM") {
            frustum = Some([
                self.float("FRUSTUM")?,
                self.float("FRUSTUM")?,
                self.float("FRUSTUM")?,
                self.float("FRUSTUM")?,
            ]);
            tok = self.token("END_CAMERA")?;
        }
        if !tok.is("END_CAMERA") {
            return Err(self.syntax_error("END_CAMERA", &tok));
        }

        if let Some(projection) = projection {
            self.scene.camera_projection(projection);
        }
        if let Some((focal_length, aperture)) = dof {
            self.scene.camera_dof(focal_length, aperture);
        }
        self.scene.camera_setup(&camera);
        if let Some([left, right, bottom, top]) = frustum {
            self.scene.camera_frustum(left, right, bottom, top);
        }
        Ok(())
    }

    /// Scene syntax: `SHADER_MODE quality option... END_SHADER_MODE`
    ///
    /// Transparency options accumulate into the scene-wide mode, except
    /// `TRANS_ORIG`, which clears it.
    pub(crate) fn parse_shader_mode(&mut self) -> Result<()> {
        let tok = self.token("a shader mode")?;
        let mode = match tok.text.to_ascii_uppercase().as_str() {
            "FULL" => ShaderMode::Full,
            "MEDIUM" => ShaderMode::Medium,
            "LOW" => ShaderMode::Low,
            "LOWEST" => ShaderMode::Lowest,
            _ => return Err(self.syntax_error("FULL, MEDIUM, LOW or LOWEST", &tok)),
        };
        self.scene.shader_mode(mode);

        loop {
            let tok = self.token("END_SHADER_MODE")?;
            match tok.text.to_ascii_uppercase().as_str() {
                "END_SHADER_MODE" => return Ok(()),
                "SHADOW_FILTER_ON" => self.scene.shadow_filtering(true),
                "SHADOW_FILTER_OFF" => self.scene.shadow_filtering(false),
                "TRANS_MAX_SURFACES" => {
                    let count = self.i32("TRANS_MAX_SURFACES")?;
                    self.scene.trans_max_surfaces(count);
                }
                "TRANS_ORIG" => {
                    self.trans_mode = TransMode::ORIG;
                    self.scene.trans_mode(self.trans_mode);
                }
                "TRANS_RASTER3D" => {
                    self.trans_mode |= TransMode::RASTER3D;
                    self.scene.trans_mode(self.trans_mode);
                }
                "TRANS_VMD" => {
                    self.trans_mode |= TransMode::VMD;
                    self.scene.trans_mode(self.trans_mode);
                }
                "FOG_VMD" => self.scene.fog_rendering_mode(FogRenderingMode::Vmd),
                "AMBIENT_OCCLUSION" => {
                    let ambient = self.keyed_color("AMBIENT_COLOR")?;
                    let direct = self.keyed_float("RESCALE_DIRECT")?;
                    self.expect("SAMPLES")?;
                    let samples = self.i32("SAMPLES")?;
                    self.scene.rescale_lights(direct);
                    self.scene.ambient_occlusion(samples, ambient);
                }
                _ => return Err(self.syntax_error("a shader mode option", &tok)),
            }
        }
    }

    /// Scene syntax: `FOG mode START s END e DENSITY d COLOR r g b`
    pub(crate) fn parse_fog(&mut self) -> Result<()> {
        let tok = self.token("a fog mode")?;
        let mode = match tok.text.to_ascii_uppercase().as_str() {
            "LINEAR" => FogMode::Linear,
            "EXP" => FogMode::Exp,
            "EXP2" => FogMode::Exp2,
            "OFF" => FogMode::Off,
            _ => return Err(self.syntax_error("LINEAR, EXP, EXP2 or OFF", &tok)),
        };
        let start = self.keyed_float("START")?;
        let end = self.keyed_float("END")?;
        let density = self.keyed_float("DENSITY")?;
        let color = self.keyed_color("COLOR")?;

        self.scene.fog_mode(mode);
        self.scene.fog_parms(&Fog {
            color,
            start,
            end,
            density,
        });
        Ok(())
    }

    /// Scene syntax: `BACKGROUND r g b`
    pub(crate) fn parse_background(&mut self) -> Result<()> {
        let color = self.color("BACKGROUND")?;
        self.scene.background(color);
        Ok(())
    }

    /// Scene syntax: `BACKGROUND_GRADIENT kind UPDIR x y z TOPVAL t
    /// BOTTOMVAL b TOPCOLOR r g b BOTTOMCOLOR r g b`
    pub(crate) fn parse_background_gradient(&mut self) -> Result<()> {
        let tok = self.token("a gradient kind")?;
        let mode = if tok.is("SKY_SPHERE") {
            BackgroundMode::SkySphere
        } else if tok.is("SKY_ORTHO_PLANE") {
            BackgroundMode::SkyOrthoPlane
        } else {
            return Err(self.syntax_error("SKY_SPHERE or SKY_ORTHO_PLANE", &tok));
        };
        let gradient = BackgroundGradient {
            up_dir: self.keyed_vector("UPDIR")?,
            top_value: self.keyed_float("TOPVAL")?,
            bottom_value: self.keyed_float("BOTTOMVAL")?,
            top_color: self.keyed_color("TOPCOLOR")?,
            bottom_color: self.keyed_color("BOTTOMCOLOR")?,
        };

        self.scene.background_mode(mode);
        self.scene.background_gradient(&gradient);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ErrorKind;
    use crate::options::ParseOptions;
    use crate::parser::parse_scene_source;
    use crate::recording::{RecordingScene, SceneCall};
    use crate::scene::*;
    use tachyon_scene_math::{Color, Vec3};

    fn parse(body: &str) -> (crate::error::Result<()>, RecordingScene) {
        let mut scene = RecordingScene::new();
        let text = format!("BEGIN_SCENE RESOLUTION 8 8\n{body}\nEND_SCENE");
        let result = parse_scene_source("settings.dat", text, &mut scene, &ParseOptions::default());
        (result.map(|_| ()), scene)
    }

    const CAMERA_BODY: &str = "ASPECTRATIO 1 ANTIALIASING 2 RAYDEPTH 8
        CENTER 0 0 -5 VIEWDIR 0 0 1 UPDIR 0 1 0";

    #[test]
    fn test_plain_camera() {
        let (result, scene) = parse(&format!("CAMERA ZOOM 1.5 {CAMERA_BODY} END_CAMERA"));
        result.unwrap();
        let SceneCall::CameraSetup { camera } = scene.calls.last().unwrap() else {
            panic!("expected camera setup");
        };
        assert_eq!(camera.zoom, 1.5);
        assert_eq!(camera.ray_depth, 8);
        assert_eq!(camera.center, Vec3::new(0.0, 0.0, -5.0));
    }

    #[test]
    fn test_dof_camera_with_frustum() {
        let (result, scene) = parse(&format!(
            "CAMERA PROJECTION PERSPECTIVE_DOF FOCALLENGTH 3 APERTURE 0.1 ZOOM 1 {CAMERA_BODY}
             FRUSTUM -1 1 -0.5 0.5 END_CAMERA"
        ));
        result.unwrap();
        assert!(scene.calls.contains(&SceneCall::CameraProjection {
            projection: Projection::PerspectiveDof
        }));
        assert!(scene.calls.contains(&SceneCall::CameraDof {
            focal_length: 3.0,
            aperture: 0.1
        }));
        assert!(matches!(
            scene.calls.last().unwrap(),
            SceneCall::CameraFrustum { bottom, .. } if *bottom == -0.5
        ));
    }

    #[test]
    fn test_camera_missing_end() {
        let (result, _) = parse(&format!("CAMERA ZOOM 1 {CAMERA_BODY} SPHERE"));
        assert_eq!(result.unwrap_err().kind(), ErrorKind::SyntaxError);
    }

    #[test]
    fn test_unknown_projection() {
        let (result, _) = parse(&format!(
            "CAMERA PROJECTION PANORAMA ZOOM 1 {CAMERA_BODY} END_CAMERA"
        ));
        assert_eq!(result.unwrap_err().kind(), ErrorKind::SyntaxError);
    }

    #[test]
    fn test_shader_mode_trans_flags_accumulate() {
        let (result, scene) = parse(
            "SHADER_MODE MEDIUM TRANS_RASTER3D TRANS_VMD SHADOW_FILTER_OFF END_SHADER_MODE
             SHADER_MODE FULL TRANS_ORIG END_SHADER_MODE",
        );
        result.unwrap();
        let modes: Vec<TransMode> = scene
            .calls
            .iter()
            .filter_map(|c| match c {
                SceneCall::TransMode { mode } => Some(*mode),
                _ => None,
            })
            .collect();
        assert_eq!(
            modes,
            vec![
                TransMode::RASTER3D,
                TransMode::RASTER3D | TransMode::VMD,
                TransMode::ORIG
            ]
        );
        assert!(scene.calls.contains(&SceneCall::ShadowFiltering { enabled: false }));
    }

    #[test]
    fn test_shader_mode_ambient_occlusion() {
        let (result, scene) = parse(
            "SHADER_MODE FULL AMBIENT_OCCLUSION AMBIENT_COLOR 0.2 0.2 0.2 RESCALE_DIRECT 0.7 SAMPLES 16
             FOG_VMD TRANS_MAX_SURFACES 3 END_SHADER_MODE",
        );
        result.unwrap();
        assert!(scene.calls.contains(&SceneCall::RescaleLights { factor: 0.7 }));
        assert!(scene.calls.contains(&SceneCall::AmbientOcclusion {
            samples: 16,
            ambient: Color::new(0.2, 0.2, 0.2)
        }));
        assert!(scene.calls.contains(&SceneCall::FogRenderingMode {
            mode: FogRenderingMode::Vmd
        }));
        assert!(scene.calls.contains(&SceneCall::TransMaxSurfaces { count: 3 }));
    }

    #[test]
    fn test_shader_mode_unknown_option() {
        let (result, _) = parse("SHADER_MODE FULL SPARKLES END_SHADER_MODE");
        assert_eq!(result.unwrap_err().kind(), ErrorKind::SyntaxError);
    }

    #[test]
    fn test_fog() {
        let (result, scene) = parse("FOG EXP2 START 0 END 50 DENSITY 0.3 COLOR 0.5 0.5 0.5");
        result.unwrap();
        let n = scene.calls.len();
        assert_eq!(scene.calls[n - 2], SceneCall::FogMode { mode: FogMode::Exp2 });
        assert!(matches!(&scene.calls[n - 1], SceneCall::FogParms { fog } if fog.end == 50.0));
    }

    #[test]
    fn test_background_gradient() {
        let (result, scene) = parse(
            "BACKGROUND 0 0 0.2
             BACKGROUND_GRADIENT SKY_ORTHO_PLANE UPDIR 0 1 0 TOPVAL 1 BOTTOMVAL -1
             TOPCOLOR 0 0 1 BOTTOMCOLOR 1 1 1",
        );
        result.unwrap();
        assert!(scene.calls.contains(&SceneCall::Background {
            color: Color::new(0.0, 0.0, 0.2)
        }));
        assert!(scene.calls.contains(&SceneCall::BackgroundMode {
            mode: BackgroundMode::SkyOrthoPlane
        }));
        assert!(matches!(
            scene.calls.last().unwrap(),
            SceneCall::BackgroundGradient { gradient } if gradient.bottom_value == -1.0
        ));
    }

    #[test]
    fn test_background_gradient_bad_kind() {
        let (result, _) = parse("BACKGROUND_GRADIENT SKY_CUBE UPDIR 0 1 0");
        assert_eq!(result.unwrap_err().kind(), ErrorKind::SyntaxError);
    }
}
