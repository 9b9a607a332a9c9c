//! A [`SceneBuilder`] that records every call.
//!
//! Used by the command-line tool to dump a parsed scene as JSON, and by tests
//! to check exactly what the parser issued.

use serde::Serialize;
use tachyon_scene_math::{Color, Vec3};

use crate::scene::*;

/// One recorded scene-construction call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum SceneCall {
    Resolution { width: u32, height: u32 },
    OutputFile { name: String },
    Verbose { level: i32 },
    ShaderMode { mode: ShaderMode },
    ShadowFiltering { enabled: bool },
    TransMaxSurfaces { count: i32 },
    TransMode { mode: TransMode },
    FogRenderingMode { mode: FogRenderingMode },
    RescaleLights { factor: f64 },
    AmbientOcclusion { samples: i32, ambient: Color },
    CameraProjection { projection: Projection },
    CameraDof { focal_length: f64, aperture: f64 },
    CameraSetup { camera: CameraSetup },
    CameraFrustum { left: f64, right: f64, bottom: f64, top: f64 },
    Texture { id: TextureId, desc: TextureDesc },
    TexturePhong { tex: TextureId, phong: Phong },
    TextureTransMode { tex: TextureId, mode: TransMode },
    TextureOutline { tex: TextureId, outline: Outline },
    TextureCopyVcstri { tex: TextureId, copy: TextureId },
    DefineTeximage { name: String, xres: usize, yres: usize, zres: usize, rgb: Vec<u8> },
    Sphere { tex: TextureId, center: Vec3, radius: f64 },
    Plane { tex: TextureId, center: Vec3, normal: Vec3 },
    Box { tex: TextureId, min: Vec3, max: Vec3 },
    Ring { tex: TextureId, center: Vec3, normal: Vec3, inner: f64, outer: f64 },
    Cylinder { tex: TextureId, center: Vec3, axis: Vec3, radius: f64 },
    Fcylinder { tex: TextureId, base: Vec3, axis: Vec3, radius: f64 },
    Polycylinder { tex: TextureId, points: Vec<Vec3>, radius: f64 },
    Triangle { tex: TextureId, v0: Vec3, v1: Vec3, v2: Vec3 },
    SmoothTriangle { tex: TextureId, vertices: [Vec3; 3], normals: [Vec3; 3] },
    Vcstri { tex: TextureId, vertices: [ColoredVertex; 3] },
    Landscape { tex: TextureId, m: usize, n: usize, center: Vec3, wx: f64, wy: f64 },
    ScalarVolume { tex: TextureId, min: Vec3, max: Vec3, dims: [usize; 3], file: String },
    Light { id: LightId, tex: TextureId, center: Vec3, radius: f64 },
    DirectionalLight { id: LightId, tex: TextureId, direction: Vec3 },
    Spotlight {
        id: LightId,
        tex: TextureId,
        center: Vec3,
        radius: f64,
        direction: Vec3,
        falloff_start: f64,
        falloff_end: f64,
    },
    LightAttenuation { light: LightId, attenuation: Attenuation },
    Background { color: Color },
    BackgroundMode { mode: BackgroundMode },
    BackgroundGradient { gradient: BackgroundGradient },
    FogMode { mode: FogMode },
    FogParms { fog: Fog },
    ClipPlanes { planes: Vec<ClipPlane> },
    ClipOff,
}

/// Scene that stores calls instead of building anything.
#[derive(Debug, Default, Clone)]
pub struct RecordingScene {
    /// Calls in the order they were issued.
    pub calls: Vec<SceneCall>,
    textures: Vec<TextureDesc>,
    lights: usize,
}

impl RecordingScene {
    /// Create an empty recording.
    pub fn new() -> Self {
        Self::default()
    }

    /// Description of a texture created through this scene.
    pub fn texture_desc(&self, id: TextureId) -> Option<&TextureDesc> {
        self.textures.get(id.0)
    }

    /// Number of textures created, including copies.
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Number of geometric primitives recorded.
    pub fn object_count(&self) -> usize {
        self.calls.iter().filter(|c| c.is_geometry()).count()
    }

    fn new_texture(&mut self, desc: TextureDesc) -> TextureId {
        let id = TextureId(self.textures.len());
        self.textures.push(desc);
        id
    }

    fn new_light(&mut self) -> LightId {
        let id = LightId(self.lights);
        self.lights += 1;
        id
    }
}

impl SceneCall {
    /// Whether this call creates a renderable primitive.
    pub fn is_geometry(&self) -> bool {
        matches!(
            self,
            Self::Sphere { .. }
                | Self::Plane { .. }
                | Self::Box { .. }
                | Self::Ring { .. }
                | Self::Cylinder { .. }
                | Self::Fcylinder { .. }
                | Self::Polycylinder { .. }
                | Self::Triangle { .. }
                | Self::SmoothTriangle { .. }
                | Self::Vcstri { .. }
                | Self::Landscape { .. }
                | Self::ScalarVolume { .. }
        )
    }
}

impl SceneBuilder for RecordingScene {
    fn resolution(&mut self, width: u32, height: u32) {
        self.calls.push(SceneCall::Resolution { width, height });
    }

    fn output_file(&mut self, name: &str) {
        self.calls.push(SceneCall::OutputFile { name: name.into() });
    }

    fn verbose(&mut self, level: i32) {
        self.calls.push(SceneCall::Verbose { level });
    }

    fn shader_mode(&mut self, mode: ShaderMode) {
        self.calls.push(SceneCall::ShaderMode { mode });
    }

    fn shadow_filtering(&mut self, enabled: bool) {
        self.calls.push(SceneCall::ShadowFiltering { enabled });
    }

    fn trans_max_surfaces(&mut self, count: i32) {
        self.calls.push(SceneCall::TransMaxSurfaces { count });
    }

    fn trans_mode(&mut self, mode: TransMode) {
        self.calls.push(SceneCall::TransMode { mode });
    }

    fn fog_rendering_mode(&mut self, mode: FogRenderingMode) {
        self.calls.push(SceneCall::FogRenderingMode { mode });
    }

    fn rescale_lights(&mut self, factor: f64) {
        self.calls.push(SceneCall::RescaleLights { factor });
    }

    fn ambient_occlusion(&mut self, samples: i32, ambient: Color) {
        self.calls.push(SceneCall::AmbientOcclusion { samples, ambient });
    }

    fn camera_projection(&mut self, projection: Projection) {
        self.calls.push(SceneCall::CameraProjection { projection });
    }

    fn camera_dof(&mut self, focal_length: f64, aperture: f64) {
        self.calls.push(SceneCall::CameraDof {
            focal_length,
            aperture,
        });
    }

    fn camera_setup(&mut self, camera: &CameraSetup) {
        self.calls.push(SceneCall::CameraSetup { camera: *camera });
    }

    fn camera_frustum(&mut self, left: f64, right: f64, bottom: f64, top: f64) {
        self.calls.push(SceneCall::CameraFrustum {
            left,
            right,
            bottom,
            top,
        });
    }

    fn texture(&mut self, desc: &TextureDesc) -> TextureId {
        let id = self.new_texture(desc.clone());
        self.calls.push(SceneCall::Texture {
            id,
            desc: desc.clone(),
        });
        id
    }

    fn texture_phong(&mut self, tex: TextureId, phong: Phong) {
        self.calls.push(SceneCall::TexturePhong { tex, phong });
    }

    fn texture_trans_mode(&mut self, tex: TextureId, mode: TransMode) {
        self.calls.push(SceneCall::TextureTransMode { tex, mode });
    }

    fn texture_outline(&mut self, tex: TextureId, outline: Outline) {
        self.calls.push(SceneCall::TextureOutline { tex, outline });
    }

    fn texture_copy_vcstri(&mut self, tex: TextureId) -> TextureId {
        let desc = self.texture_desc(tex).cloned().unwrap_or_default();
        let copy = self.new_texture(desc);
        self.calls.push(SceneCall::TextureCopyVcstri { tex, copy });
        copy
    }

    fn define_teximage_rgb24(
        &mut self,
        name: &str,
        xres: usize,
        yres: usize,
        zres: usize,
        rgb: Vec<u8>,
    ) {
        self.calls.push(SceneCall::DefineTeximage {
            name: name.into(),
            xres,
            yres,
            zres,
            rgb,
        });
    }

    fn sphere(&mut self, tex: TextureId, center: Vec3, radius: f64) {
        self.calls.push(SceneCall::Sphere {
            tex,
            center,
            radius,
        });
    }

    fn plane(&mut self, tex: TextureId, center: Vec3, normal: Vec3) {
        self.calls.push(SceneCall::Plane {
            tex,
            center,
            normal,
        });
    }

    fn axis_box(&mut self, tex: TextureId, min: Vec3, max: Vec3) {
        self.calls.push(SceneCall::Box { tex, min, max });
    }

    fn ring(&mut self, tex: TextureId, center: Vec3, normal: Vec3, inner: f64, outer: f64) {
        self.calls.push(SceneCall::Ring {
            tex,
            center,
            normal,
            inner,
            outer,
        });
    }

    fn cylinder(&mut self, tex: TextureId, center: Vec3, axis: Vec3, radius: f64) {
        self.calls.push(SceneCall::Cylinder {
            tex,
            center,
            axis,
            radius,
        });
    }

    fn fcylinder(&mut self, tex: TextureId, base: Vec3, axis: Vec3, radius: f64) {
        self.calls.push(SceneCall::Fcylinder {
            tex,
            base,
            axis,
            radius,
        });
    }

    fn polycylinder(&mut self, tex: TextureId, points: &[Vec3], radius: f64) {
        self.calls.push(SceneCall::Polycylinder {
            tex,
            points: points.to_vec(),
            radius,
        });
    }

    fn triangle(&mut self, tex: TextureId, v0: Vec3, v1: Vec3, v2: Vec3) {
        self.calls.push(SceneCall::Triangle { tex, v0, v1, v2 });
    }

    fn smooth_triangle(&mut self, tex: TextureId, vertices: [Vec3; 3], normals: [Vec3; 3]) {
        self.calls.push(SceneCall::SmoothTriangle {
            tex,
            vertices,
            normals,
        });
    }

    fn vcstri(&mut self, tex: TextureId, vertices: [ColoredVertex; 3]) {
        self.calls.push(SceneCall::Vcstri { tex, vertices });
    }

    fn landscape(&mut self, tex: TextureId, m: usize, n: usize, center: Vec3, wx: f64, wy: f64) {
        self.calls.push(SceneCall::Landscape {
            tex,
            m,
            n,
            center,
            wx,
            wy,
        });
    }

    fn scalar_volume(
        &mut self,
        tex: TextureId,
        min: Vec3,
        max: Vec3,
        dims: [usize; 3],
        file: &str,
    ) {
        self.calls.push(SceneCall::ScalarVolume {
            tex,
            min,
            max,
            dims,
            file: file.into(),
        });
    }

    fn light(&mut self, tex: TextureId, center: Vec3, radius: f64) -> LightId {
        let id = self.new_light();
        self.calls.push(SceneCall::Light {
            id,
            tex,
            center,
            radius,
        });
        id
    }

    fn directional_light(&mut self, tex: TextureId, direction: Vec3) -> LightId {
        let id = self.new_light();
        self.calls.push(SceneCall::DirectionalLight { id, tex, direction });
        id
    }

    fn spotlight(
        &mut self,
        tex: TextureId,
        center: Vec3,
        radius: f64,
        direction: Vec3,
        falloff_start: f64,
        falloff_end: f64,
    ) -> LightId {
        let id = self.new_light();
        self.calls.push(SceneCall::Spotlight {
            id,
            tex,
            center,
            radius,
            direction,
            falloff_start,
            falloff_end,
        });
        id
    }

    fn light_attenuation(&mut self, light: LightId, attenuation: Attenuation) {
        self.calls.push(SceneCall::LightAttenuation { light, attenuation });
    }

    fn background(&mut self, color: Color) {
        self.calls.push(SceneCall::Background { color });
    }

    fn background_mode(&mut self, mode: BackgroundMode) {
        self.calls.push(SceneCall::BackgroundMode { mode });
    }

    fn background_gradient(&mut self, gradient: &BackgroundGradient) {
        self.calls.push(SceneCall::BackgroundGradient {
            gradient: *gradient,
        });
    }

    fn fog_mode(&mut self, mode: FogMode) {
        self.calls.push(SceneCall::FogMode { mode });
    }

    fn fog_parms(&mut self, fog: &Fog) {
        self.calls.push(SceneCall::FogParms { fog: *fog });
    }

    fn clip_planes(&mut self, planes: &[ClipPlane]) {
        self.calls.push(SceneCall::ClipPlanes {
            planes: planes.to_vec(),
        });
    }

    fn clip_off(&mut self) {
        self.calls.push(SceneCall::ClipOff);
    }
}
