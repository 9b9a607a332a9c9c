//! Recursive-descent scene parser: token helpers, object dispatch, include
//! handling and the top-level driver.
//!
//! Object grammars live in [`crate::objects`]; each is an `impl` block on
//! [`SceneParser`] built from the helpers here.

use std::fs;
use std::mem;
use std::path::Path;

use log::{debug, error, info, trace, warn};
use tachyon_scene_math::{Color, Vec3};

use crate::error::{ParseError, Result};
use crate::lexer::{Reader, Token};
use crate::options::ParseOptions;
use crate::scene::{SceneBuilder, TextureId, TransMode};
use crate::textures::TextureTable;

/// Statistics from a successful parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseSummary {
    /// Objects and directives read, including comments and those read from includes.
    pub objects_parsed: usize,
    /// Texture names defined before the table was released.
    pub textures_defined: usize,
}

/// One input stream with the name used in diagnostics.
#[derive(Debug)]
pub(crate) struct Source {
    pub(crate) name: String,
    pub(crate) reader: Reader,
}

impl Source {
    pub(crate) fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            reader: Reader::new(bytes),
        }
    }
}

/// Outcome of reading one object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ObjectStep {
    Parsed,
    EndScene,
    EndOfInput,
}

/// Top-level keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Directive {
    Tri,
    Stri,
    Vcstri,
    VertexArray,
    Sphere,
    Fcylinder,
    Ring,
    Polycylinder,
    Cylinder,
    Plane,
    Box,
    ScalarVol,
    ImageDef,
    TexDef,
    TexAlias,
    Light,
    DirectionalLight,
    SkyLight,
    Spotlight,
    Scape,
    ShaderMode,
    Camera,
    TPolyFile,
    MgfFile,
    Background,
    BackgroundGradient,
    Fog,
    Include,
    StartClipGroup,
    EndClipGroup,
    EndScene,
}

impl Directive {
    fn from_keyword(word: &str) -> Option<Self> {
        Some(match word.to_ascii_uppercase().as_str() {
            "TRI" => Self::Tri,
            "STRI" => Self::Stri,
            "VCSTRI" => Self::Vcstri,
            "VERTEXARRAY" => Self::VertexArray,
            "SPHERE" => Self::Sphere,
            "FCYLINDER" => Self::Fcylinder,
            "RING" => Self::Ring,
            "POLYCYLINDER" => Self::Polycylinder,
            "CYLINDER" => Self::Cylinder,
            "PLANE" => Self::Plane,
            "BOX" => Self::Box,
            "SCALARVOL" => Self::ScalarVol,
            "IMAGEDEF" => Self::ImageDef,
            "TEXDEF" => Self::TexDef,
            "TEXALIAS" => Self::TexAlias,
            "LIGHT" => Self::Light,
            "DIRECTIONAL_LIGHT" => Self::DirectionalLight,
            "SKY_LIGHT" => Self::SkyLight,
            "SPOTLIGHT" => Self::Spotlight,
            "SCAPE" => Self::Scape,
            "SHADER_MODE" => Self::ShaderMode,
            "CAMERA" => Self::Camera,
            "TPOLYFILE" => Self::TPolyFile,
            "MGFFILE" => Self::MgfFile,
            "BACKGROUND" => Self::Background,
            "BACKGROUND_GRADIENT" => Self::BackgroundGradient,
            "FOG" => Self::Fog,
            "INCLUDE" => Self::Include,
            "START_CLIPGROUP" => Self::StartClipGroup,
            "END_CLIPGROUP" => Self::EndClipGroup,
            "END_SCENE" => Self::EndScene,
            _ => return None,
        })
    }
}

/// Parser state for one top-level scene file and everything it includes.
pub struct SceneParser<'a, S: SceneBuilder + ?Sized> {
    pub(crate) scene: &'a mut S,
    pub(crate) options: &'a ParseOptions,
    pub(crate) textures: TextureTable,
    /// Scene-wide transparency flags accumulated by `SHADER_MODE` blocks.
    pub(crate) trans_mode: TransMode,
    source: Source,
    parents: Vec<Source>,
    objects_parsed: usize,
}

impl<'a, S: SceneBuilder + ?Sized> SceneParser<'a, S> {
    /// Create a parser over `bytes`, initialising the texture table.
    pub fn new(name: &str, bytes: Vec<u8>, scene: &'a mut S, options: &'a ParseOptions) -> Self {
        let textures = TextureTable::reset(scene, options);
        Self {
            scene,
            options,
            textures,
            trans_mode: TransMode::ORIG,
            source: Source::new(name, bytes),
            parents: Vec::new(),
            objects_parsed: 0,
        }
    }

    /// Parse the whole scene, releasing the texture table afterwards.
    pub fn run(mut self) -> Result<ParseSummary> {
        let result = self.parse_scene();
        let summary = ParseSummary {
            objects_parsed: self.objects_parsed,
            textures_defined: self.textures.len(),
        };
        self.textures.destroy();
        result.map(|()| summary)
    }

    fn parse_scene(&mut self) -> Result<()> {
        self.skip_header()?;
        self.scene_defs()?;

        match self.parse_objects()? {
            ObjectStep::EndOfInput if self.options.strict_end_of_input => {
                Err(ParseError::end_of_input(&self.source.name, "END_SCENE"))
            }
            ObjectStep::EndOfInput => {
                debug!("{}: end of input without END_SCENE", self.source.name);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Skip leading comment lines up to `BEGIN_SCENE`.
    fn skip_header(&mut self) -> Result<()> {
        loop {
            let tok = self.token("BEGIN_SCENE")?;
            if tok.is("BEGIN_SCENE") {
                return Ok(());
            }
            if !tok.is_comment() {
                return Err(self.syntax_error("BEGIN_SCENE", &tok));
            }
            self.source.reader.skip_line();
        }
    }

    fn scene_defs(&mut self) -> Result<()> {
        self.expect("RESOLUTION")?;
        let width = self.resolution_component()?;
        let height = self.resolution_component()?;

        self.scene.output_file(&self.options.default_output_file);
        self.scene.resolution(width, height);
        self.scene.verbose(self.options.default_verbosity);
        info!("{}: resolution {}x{}", self.source.name, width, height);
        Ok(())
    }

    fn resolution_component(&mut self) -> Result<u32> {
        let tok = self.token("a resolution")?;
        tok.text
            .parse::<u32>()
            .map_err(|_| self.syntax_error("a resolution", &tok))
    }

    /// Read objects until `END_SCENE` or end of input.
    pub(crate) fn parse_objects(&mut self) -> Result<ObjectStep> {
        loop {
            match self.parse_object()? {
                ObjectStep::Parsed => self.objects_parsed += 1,
                step => return Ok(step),
            }
        }
    }

    fn parse_object(&mut self) -> Result<ObjectStep> {
        let Some(tok) = self.next_token()? else {
            return Ok(ObjectStep::EndOfInput);
        };
        if tok.is_comment() {
            self.source.reader.skip_line();
            return Ok(ObjectStep::Parsed);
        }
        let Some(directive) = Directive::from_keyword(&tok.text) else {
            return Err(self.syntax_error("an object or other declaration", &tok));
        };
        trace!("{}: {:?} at offset {}", self.source.name, directive, tok.offset);

        match directive {
            Directive::Tri => self.parse_tri(),
            Directive::Stri => self.parse_stri(),
            Directive::Vcstri => self.parse_vcstri(),
            Directive::VertexArray => self.parse_vertex_array(),
            Directive::Sphere => self.parse_sphere(),
            Directive::Fcylinder => self.parse_fcylinder(),
            Directive::Ring => self.parse_ring(),
            Directive::Polycylinder => self.parse_polycylinder(),
            Directive::Cylinder => self.parse_cylinder(),
            Directive::Plane => self.parse_plane(),
            Directive::Box => self.parse_box(),
            Directive::ScalarVol => self.parse_scalar_volume(),
            Directive::ImageDef => self.parse_image_def(),
            Directive::TexDef => self.parse_tex_def(),
            Directive::TexAlias => self.parse_tex_alias(),
            Directive::Light => self.parse_light(),
            Directive::DirectionalLight => self.parse_directional_light(),
            Directive::SkyLight => self.parse_sky_light(),
            Directive::Spotlight => self.parse_spotlight(),
            Directive::Scape => self.parse_landscape(),
            Directive::ShaderMode => self.parse_shader_mode(),
            Directive::Camera => self.parse_camera(),
            Directive::TPolyFile => self.parse_tpolyfile(),
            Directive::MgfFile => {
                let name = self.word("an MGF file name")?;
                error!("{}: MGF import is not available ({})", self.source.name, name);
                Err(self.syntax_error("a supported object", &tok))
            }
            Directive::Background => self.parse_background(),
            Directive::BackgroundGradient => self.parse_background_gradient(),
            Directive::Fog => self.parse_fog(),
            Directive::Include => self.parse_include(),
            Directive::StartClipGroup => self.parse_clip_group(),
            Directive::EndClipGroup => {
                self.scene.clip_off();
                Ok(())
            }
            Directive::EndScene => return Ok(ObjectStep::EndScene),
        }?;
        Ok(ObjectStep::Parsed)
    }

    fn parse_include(&mut self) -> Result<()> {
        let path = self.word("an include file name")?;
        if path == self.source.name {
            warn!("possible self-recursive include of file {}", path);
        }
        if self.parents.len() >= self.options.max_include_depth {
            error!("{}: include depth limit reached at {}", self.source.name, path);
            return Err(ParseError::IncludeDepthExceeded {
                path,
                limit: self.options.max_include_depth,
            });
        }

        let bytes = self.open_sub_file(&path)?;
        self.push_source(Source::new(path, bytes));
        let result = self.parse_objects();
        self.pop_source();
        result.map(|_| ())
    }

    /// Read a file named from within the current source.
    pub(crate) fn open_sub_file(&self, path: &str) -> Result<Vec<u8>> {
        fs::read(path).map_err(|source| {
            error!("{}: failed to open {}: {}", self.source.name, path, source);
            ParseError::IncludeFileNotFound {
                path: path.to_string(),
                from: self.source.name.clone(),
                source,
            }
        })
    }

    /// Make `source` current, saving the active one.
    pub(crate) fn push_source(&mut self, source: Source) {
        debug!("entering {} from {}", source.name, self.source.name);
        let parent = mem::replace(&mut self.source, source);
        self.parents.push(parent);
    }

    /// Restore the source that was active before the last push.
    pub(crate) fn pop_source(&mut self) {
        if let Some(parent) = self.parents.pop() {
            let child = mem::replace(&mut self.source, parent);
            debug!("leaving {}, back in {}", child.name, self.source.name);
        }
    }

    /// Name of the source being read.
    pub(crate) fn file_name(&self) -> &str {
        &self.source.name
    }

    /// Line number of the reader cursor in the current source.
    pub(crate) fn line(&self) -> usize {
        self.source.reader.line()
    }

    /// Next token from the current source, or `None` at end of input.
    pub(crate) fn next_token(&mut self) -> Result<Option<Token>> {
        match self.source.reader.next_token() {
            Some(tok) if tok.text.len() > self.options.max_token_len => Err(self.syntax_error(
                &format!("a token of at most {} bytes", self.options.max_token_len),
                &tok,
            )),
            other => Ok(other),
        }
    }

    /// Next token, failing at end of input.
    pub(crate) fn token(&mut self, expected: &str) -> Result<Token> {
        self.next_token()?.ok_or_else(|| {
            error!("{}: unexpected end of input, expected {}", self.source.name, expected);
            ParseError::end_of_input(&self.source.name, expected)
        })
    }

    /// Require the keyword `keyword`.
    pub(crate) fn expect(&mut self, keyword: &str) -> Result<()> {
        let tok = self.token(keyword)?;
        if tok.is(keyword) {
            Ok(())
        } else {
            Err(self.syntax_error(keyword, &tok))
        }
    }

    /// Build (and log) a syntax error for `found`.
    pub(crate) fn syntax_error(&self, expected: &str, found: &Token) -> ParseError {
        let line = self.source.reader.line_at(found.offset);
        let offset = self.source.reader.offset();
        error!(
            "syntax error in {}: expected {}, found `{}` at or before offset {}, line {}",
            self.source.name, expected, found.text, offset, line
        );
        ParseError::Syntax {
            file: self.source.name.clone(),
            line,
            offset,
            expected: expected.to_string(),
            found: found.text.clone(),
        }
    }

    /// A bare word such as a name or file path.
    pub(crate) fn word(&mut self, what: &str) -> Result<String> {
        Ok(self.token(what)?.text)
    }

    pub(crate) fn float(&mut self, what: &str) -> Result<f64> {
        let tok = self.token(what)?;
        tok.text
            .parse::<f64>()
            .map_err(|_| self.syntax_error(&format!("a number for {what}"), &tok))
    }

    pub(crate) fn f32(&mut self, what: &str) -> Result<f32> {
        Ok(self.float(what)? as f32)
    }

    pub(crate) fn int(&mut self, what: &str) -> Result<i64> {
        let tok = self.token(what)?;
        tok.text
            .parse::<i64>()
            .map_err(|_| self.syntax_error(&format!("an integer for {what}"), &tok))
    }

    pub(crate) fn i32(&mut self, what: &str) -> Result<i32> {
        let tok = self.token(what)?;
        tok.text
            .parse::<i32>()
            .map_err(|_| self.syntax_error(&format!("an integer for {what}"), &tok))
    }

    /// A non-negative count.
    pub(crate) fn count(&mut self, what: &str) -> Result<usize> {
        let tok = self.token(what)?;
        tok.text
            .parse::<usize>()
            .map_err(|_| self.syntax_error(&format!("a count for {what}"), &tok))
    }

    pub(crate) fn vector(&mut self, what: &str) -> Result<Vec3> {
        let x = self.float(what)?;
        let y = self.float(what)?;
        let z = self.float(what)?;
        Ok(Vec3::new(x, y, z))
    }

    pub(crate) fn color(&mut self, what: &str) -> Result<Color> {
        let r = self.f32(what)?;
        let g = self.f32(what)?;
        let b = self.f32(what)?;
        Ok(Color::new(r, g, b))
    }

    /// `KEYWORD f`
    pub(crate) fn keyed_float(&mut self, keyword: &str) -> Result<f64> {
        self.expect(keyword)?;
        self.float(keyword)
    }

    /// `KEYWORD x y z`
    pub(crate) fn keyed_vector(&mut self, keyword: &str) -> Result<Vec3> {
        self.expect(keyword)?;
        self.vector(keyword)
    }

    /// `KEYWORD r g b`
    pub(crate) fn keyed_color(&mut self, keyword: &str) -> Result<Color> {
        self.expect(keyword)?;
        self.color(keyword)
    }

    /// Either an inline `TEXTURE` body or the name of a defined texture.
    pub(crate) fn texture_ref(&mut self) -> Result<TextureId> {
        let tok = self.token("TEXTURE or a texture name")?;
        if tok.is("TEXTURE") {
            self.texture_body()
        } else {
            Ok(self.textures.lookup(&tok.text))
        }
    }
}

/// Parse the scene file at `path` with default options.
pub fn parse_scene_file<S: SceneBuilder + ?Sized>(
    path: impl AsRef<Path>,
    scene: &mut S,
) -> Result<ParseSummary> {
    parse_scene_file_with(path, scene, &ParseOptions::default())
}

/// Parse the scene file at `path`.
pub fn parse_scene_file_with<S: SceneBuilder + ?Sized>(
    path: impl AsRef<Path>,
    scene: &mut S,
    options: &ParseOptions,
) -> Result<ParseSummary> {
    let path = path.as_ref();
    let name = path.display().to_string();
    let bytes = fs::read(path).map_err(|source| ParseError::FileNotFound {
        path: name.clone(),
        source,
    })?;
    info!("parsing scene file {}", name);
    parse_scene_source(&name, bytes, scene, options)
}

/// Parse scene text held in memory. `name` is used in diagnostics and for
/// self-include detection.
pub fn parse_scene_source<S: SceneBuilder + ?Sized>(
    name: &str,
    source: impl Into<Vec<u8>>,
    scene: &mut S,
    options: &ParseOptions,
) -> Result<ParseSummary> {
    SceneParser::new(name, source.into(), scene, options).run()
}
