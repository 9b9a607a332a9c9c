//! Scene-construction interface consumed by the parser.
//!
//! The renderer owns the scene; the parser only sees it through
//! [`SceneBuilder`], issuing one call per declaration it reads. Texture and
//! light handles are opaque ids minted by the implementation.

use std::ops::{BitOr, BitOrAssign};

use serde::Serialize;
use tachyon_scene_math::{Color, Vec3};

/// Opaque handle to a texture created by the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TextureId(pub usize);

/// Opaque handle to a light created by the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LightId(pub usize);

/// Shading quality level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ShaderMode {
    /// Best quality, slowest.
    Full,
    /// No shadows.
    Medium,
    /// Preview quality.
    Low,
    /// Fastest preview.
    Lowest,
}

/// Camera projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Projection {
    /// Standard perspective.
    Perspective,
    /// Perspective with depth of field.
    PerspectiveDof,
    /// Orthographic.
    Orthographic,
    /// Fisheye.
    Fisheye,
}

/// Distance fog falloff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FogMode {
    /// Fog disabled.
    Off,
    /// Linear falloff.
    Linear,
    /// Exponential falloff.
    Exp,
    /// Squared exponential falloff.
    Exp2,
}

/// How fog distance is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FogRenderingMode {
    /// Radial distance from the eye.
    Radial,
    /// Planar, OpenGL-like fog.
    Vmd,
}

/// Gradient background shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BackgroundMode {
    /// Gradient over a sky sphere.
    SkySphere,
    /// Gradient over an orthographic sky plane.
    SkyOrthoPlane,
}

/// Specular highlight model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum PhongKind {
    /// Highlights take the light colour.
    #[default]
    Plastic,
    /// Highlights take the surface colour.
    Metal,
}

/// Transparency rendering flags.
///
/// Flags accumulate with `|`; [`TransMode::ORIG`] is the empty set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TransMode(pub u32);

impl TransMode {
    /// Original transparency model.
    pub const ORIG: Self = Self(0);
    /// Raster3D angle-based opacity modulation.
    pub const RASTER3D: Self = Self(1);
    /// Opacity post-multiply.
    pub const VMD: Self = Self(2);

    /// Whether every flag in `other` is set.
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for TransMode {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for TransMode {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Procedural or image texture function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TextureFunction {
    /// Flat colour.
    #[default]
    Constant,
    /// 3D checkerboard.
    Checker3d,
    /// Grit noise.
    Grit,
    /// Marble.
    Marble,
    /// Wood grain.
    Wood,
    /// Linear gradient.
    Gradient,
    /// Cylindrical checkerboard.
    CylindricalChecker,
    /// Image mapped around a cylinder.
    CylindricalImage,
    /// Image mapped around a sphere.
    SphericalImage,
    /// Image projected onto a plane.
    PlanarImage,
    /// Volumetric image.
    VolumeImage,
}

impl TextureFunction {
    /// Look up a function by its scene-file code.
    pub fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            0 => Self::Constant,
            1 => Self::Checker3d,
            2 => Self::Grit,
            3 => Self::Marble,
            4 => Self::Wood,
            5 => Self::Gradient,
            6 => Self::CylindricalChecker,
            7 => Self::CylindricalImage,
            8 => Self::SphericalImage,
            9 => Self::PlanarImage,
            10 => Self::VolumeImage,
            _ => return None,
        })
    }

    /// Whether the function reads an image name.
    pub fn uses_image(self) -> bool {
        matches!(
            self,
            Self::CylindricalImage | Self::SphericalImage | Self::PlanarImage | Self::VolumeImage
        )
    }
}

/// Placement of a texture function in object space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextureMapping {
    /// Origin.
    pub center: Vec3,
    /// Rotation angles.
    pub rotate: Vec3,
    /// Scale factors.
    pub scale: Vec3,
    /// Image U axis.
    pub uaxis: Vec3,
    /// Image V axis.
    pub vaxis: Vec3,
    /// Image W axis (volume images).
    pub waxis: Vec3,
}

impl Default for TextureMapping {
    fn default() -> Self {
        Self {
            center: Vec3::zeros(),
            rotate: Vec3::zeros(),
            scale: Vec3::zeros(),
            uaxis: Vec3::zeros(),
            vaxis: Vec3::zeros(),
            waxis: Vec3::zeros(),
        }
    }
}

/// Everything needed to create a texture.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TextureDesc {
    /// Base colour.
    pub color: Color,
    /// Ambient coefficient.
    pub ambient: f32,
    /// Diffuse coefficient.
    pub diffuse: f32,
    /// Specular (reflection) coefficient.
    pub specular: f32,
    /// Opacity, 1.0 being opaque.
    pub opacity: f32,
    /// Texture function.
    pub function: TextureFunction,
    /// Function placement.
    pub mapping: TextureMapping,
    /// Image name for image-based functions.
    pub image: Option<String>,
}

impl TextureDesc {
    /// The opaque white diffuse texture used when a name is undefined.
    pub fn fallback() -> Self {
        Self {
            color: Color::WHITE,
            ambient: 0.1,
            diffuse: 0.9,
            specular: 0.0,
            opacity: 1.0,
            ..Self::default()
        }
    }

    /// A texture carrying only a light's colour.
    pub fn light(color: Color) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }
}

/// Specular highlight parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Phong {
    /// Highlight intensity.
    pub level: f32,
    /// Highlight exponent.
    pub exponent: f32,
    /// Highlight model.
    pub kind: PhongKind,
}

impl Default for Phong {
    fn default() -> Self {
        Self {
            level: 0.0,
            exponent: 100.0,
            kind: PhongKind::Plastic,
        }
    }
}

/// Silhouette outline parameters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Outline {
    /// Outline darkening factor.
    pub outline: f32,
    /// Outline width.
    pub width: f32,
}

/// Light attenuation coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Attenuation {
    /// Constant term.
    pub constant: f64,
    /// Linear term.
    pub linear: f64,
    /// Quadratic term.
    pub quadratic: f64,
}

/// Camera placement and sampling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraSetup {
    /// Zoom factor.
    pub zoom: f64,
    /// Aspect ratio.
    pub aspect_ratio: f64,
    /// Antialiasing samples per pixel.
    pub antialiasing: i32,
    /// Maximum ray recursion depth.
    pub ray_depth: i32,
    /// Eye position.
    pub center: Vec3,
    /// View direction.
    pub view_dir: Vec3,
    /// Up direction.
    pub up_dir: Vec3,
}

/// Sky gradient background.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BackgroundGradient {
    /// Gradient up direction.
    pub up_dir: Vec3,
    /// Gradient parameter at the top colour.
    pub top_value: f64,
    /// Gradient parameter at the bottom colour.
    pub bottom_value: f64,
    /// Top colour.
    pub top_color: Color,
    /// Bottom colour.
    pub bottom_color: Color,
}

/// Fog parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Fog {
    /// Fog colour.
    pub color: Color,
    /// Start distance.
    pub start: f64,
    /// End distance.
    pub end: f64,
    /// Density.
    pub density: f64,
}

/// A clip plane `a*x + b*y + c*z + d`.
pub type ClipPlane = [f64; 4];

/// A vertex with normal and colour, for per-vertex-coloured triangles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColoredVertex {
    /// Position.
    pub point: Vec3,
    /// Normal.
    pub normal: Vec3,
    /// Colour.
    pub color: Color,
}

/// The scene-construction API of a ray tracer.
///
/// Calls arrive in file order from a single thread.
pub trait SceneBuilder {
    /// Output image size.
    fn resolution(&mut self, width: u32, height: u32);
    /// Output image file name.
    fn output_file(&mut self, name: &str);
    /// Renderer verbosity.
    fn verbose(&mut self, level: i32);

    /// Shading quality.
    fn shader_mode(&mut self, mode: ShaderMode);
    /// Whether transparent surfaces filter shadows.
    fn shadow_filtering(&mut self, enabled: bool);
    /// Cap on transparent surfaces shown along a ray.
    fn trans_max_surfaces(&mut self, count: i32);
    /// Scene-wide transparency mode.
    fn trans_mode(&mut self, mode: TransMode);
    /// How fog distance is measured.
    fn fog_rendering_mode(&mut self, mode: FogRenderingMode);
    /// Scale factor for direct lighting.
    fn rescale_lights(&mut self, factor: f64);
    /// Ambient-occlusion sky lighting.
    fn ambient_occlusion(&mut self, samples: i32, ambient: Color);

    /// Camera projection.
    fn camera_projection(&mut self, projection: Projection);
    /// Depth-of-field parameters.
    fn camera_dof(&mut self, focal_length: f64, aperture: f64);
    /// Camera placement.
    fn camera_setup(&mut self, camera: &CameraSetup);
    /// Explicit view frustum.
    fn camera_frustum(&mut self, left: f64, right: f64, bottom: f64, top: f64);

    /// Create a texture.
    fn texture(&mut self, desc: &TextureDesc) -> TextureId;
    /// Set specular highlight parameters on a texture.
    fn texture_phong(&mut self, tex: TextureId, phong: Phong);
    /// Set a texture's transparency mode.
    fn texture_trans_mode(&mut self, tex: TextureId, mode: TransMode);
    /// Set outline parameters on a texture.
    fn texture_outline(&mut self, tex: TextureId, outline: Outline);
    /// Clone a texture for use by a per-vertex-coloured triangle.
    fn texture_copy_vcstri(&mut self, tex: TextureId) -> TextureId;
    /// Register an RGB24 image under `name` for image-based textures.
    fn define_teximage_rgb24(
        &mut self,
        name: &str,
        xres: usize,
        yres: usize,
        zres: usize,
        rgb: Vec<u8>,
    );

    /// Sphere.
    fn sphere(&mut self, tex: TextureId, center: Vec3, radius: f64);
    /// Infinite plane.
    fn plane(&mut self, tex: TextureId, center: Vec3, normal: Vec3);
    /// Axis-aligned box.
    fn axis_box(&mut self, tex: TextureId, min: Vec3, max: Vec3);
    /// Flat ring.
    fn ring(&mut self, tex: TextureId, center: Vec3, normal: Vec3, inner: f64, outer: f64);
    /// Infinite open cylinder.
    fn cylinder(&mut self, tex: TextureId, center: Vec3, axis: Vec3, radius: f64);
    /// Finite capped cylinder.
    fn fcylinder(&mut self, tex: TextureId, base: Vec3, axis: Vec3, radius: f64);
    /// Chain of cylinders through `points`.
    fn polycylinder(&mut self, tex: TextureId, points: &[Vec3], radius: f64);
    /// Flat triangle.
    fn triangle(&mut self, tex: TextureId, v0: Vec3, v1: Vec3, v2: Vec3);
    /// Smooth-shaded triangle.
    fn smooth_triangle(&mut self, tex: TextureId, vertices: [Vec3; 3], normals: [Vec3; 3]);
    /// Smooth-shaded triangle with per-vertex colours.
    fn vcstri(&mut self, tex: TextureId, vertices: [ColoredVertex; 3]);
    /// Height-field landscape.
    fn landscape(&mut self, tex: TextureId, m: usize, n: usize, center: Vec3, wx: f64, wy: f64);
    /// Scalar volume read from an external density file.
    fn scalar_volume(&mut self, tex: TextureId, min: Vec3, max: Vec3, dims: [usize; 3], file: &str);

    /// Point light.
    fn light(&mut self, tex: TextureId, center: Vec3, radius: f64) -> LightId;
    /// Directional light.
    fn directional_light(&mut self, tex: TextureId, direction: Vec3) -> LightId;
    /// Spotlight.
    fn spotlight(
        &mut self,
        tex: TextureId,
        center: Vec3,
        radius: f64,
        direction: Vec3,
        falloff_start: f64,
        falloff_end: f64,
    ) -> LightId;
    /// Attenuation for a light.
    fn light_attenuation(&mut self, light: LightId, attenuation: Attenuation);

    /// Solid background colour.
    fn background(&mut self, color: Color);
    /// Gradient background shape.
    fn background_mode(&mut self, mode: BackgroundMode);
    /// Gradient background parameters.
    fn background_gradient(&mut self, gradient: &BackgroundGradient);
    /// Fog falloff.
    fn fog_mode(&mut self, mode: FogMode);
    /// Fog parameters.
    fn fog_parms(&mut self, fog: &Fog);

    /// Clip subsequent geometry against `planes`.
    fn clip_planes(&mut self, planes: &[ClipPlane]);
    /// Stop clipping subsequent geometry.
    fn clip_off(&mut self);
}
