//! Per-object grammars.
//!
//! Each submodule adds parsing methods to [`SceneParser`](crate::parser::SceneParser)
//! for one family of declarations. Every method consumes exactly its own
//! grammar. Records issue their construction calls only once all fields have
//! been read, so a malformed record never produces partial geometry; the
//! `SHADER_MODE` option list and vertex arrays are applied as they stream.

mod clip;
mod geometry;
mod lights;
mod polyfile;
mod settings;
mod texture;
mod vertex_array;

pub use texture::decode_hex_color;
pub use vertex_array::strip_triangle;
