#![warn(missing_docs)]

//! Tachyon scene-file parser.
//!
//! Reads the whitespace-separated Tachyon scene language (`BEGIN_SCENE` ...
//! `END_SCENE`) and drives a [`SceneBuilder`] with one construction call per
//! declaration. Named textures, `INCLUDE` files, clip groups, vertex arrays
//! and transformed polygon files are resolved here, so the builder only sees
//! concrete geometry, lights and settings.
//!
//! # Example
//!
//! ```no_run
//! use tachyon_scene::{parse_scene_file, RecordingScene};
//!
//! let mut scene = RecordingScene::new();
//! let summary = parse_scene_file("teapot.dat", &mut scene).unwrap();
//! println!("{} objects", summary.objects_parsed);
//! ```

mod error;
mod lexer;
mod objects;
mod options;
mod parser;
mod recording;
mod scene;
mod textures;

pub use error::{ErrorKind, ParseError, Result};
pub use lexer::{Reader, Token};
pub use objects::{decode_hex_color, strip_triangle};
pub use options::ParseOptions;
pub use parser::{
    parse_scene_file, parse_scene_file_with, parse_scene_source, ParseSummary, SceneParser,
};
pub use recording::{RecordingScene, SceneCall};
pub use scene::{
    Attenuation, BackgroundGradient, BackgroundMode, CameraSetup, ClipPlane, ColoredVertex, Fog,
    FogMode, FogRenderingMode, LightId, Outline, Phong, PhongKind, Projection, SceneBuilder,
    ShaderMode, TextureDesc, TextureFunction, TextureId, TextureMapping, TransMode,
};
pub use textures::TextureTable;
pub use tachyon_scene_math::{Color, Vec3};
