//! Named texture table.
//!
//! Maps names from `TEXDEF`/`TEXALIAS` to texture handles. Lookups are
//! case-sensitive and the first definition of a name wins. Unknown names
//! resolve to a default texture so a scene with a typo still renders.

use std::collections::HashMap;

use log::{debug, warn};

use crate::error::{ParseError, Result};
use crate::options::ParseOptions;
use crate::scene::{SceneBuilder, TextureDesc, TextureId};

#[derive(Debug, Clone)]
struct Entry {
    name: String,
    texture: TextureId,
}

/// Texture names in definition order, indexed by name.
#[derive(Debug)]
pub struct TextureTable {
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
    default: TextureId,
    limit: Option<usize>,
    degraded: bool,
}

impl TextureTable {
    /// Create an empty table, allocating the default texture through `scene`.
    pub fn reset<S: SceneBuilder + ?Sized>(scene: &mut S, options: &ParseOptions) -> Self {
        let default = scene.texture(&TextureDesc::fallback());
        let mut capacity = options.texture_capacity;
        if let Some(limit) = options.texture_capacity_limit {
            capacity = capacity.min(limit);
        }
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            default,
            limit: options.texture_capacity_limit,
            degraded: false,
        }
    }

    /// Associate `name` with `texture`.
    ///
    /// When the table cannot grow, the last slot is overwritten and the name
    /// is pointed at it; the error is still returned so the caller can report
    /// it.
    pub fn define(&mut self, name: &str, texture: TextureId) -> Result<()> {
        let full = self.entries.len() == self.entries.capacity()
            || self.limit.is_some_and(|limit| self.entries.len() >= limit);
        if !self.degraded && full {
            if let Err(err) = self.grow() {
                warn!("texture table full, overwriting last entry with `{}`", name);
                self.degraded = true;
                self.overwrite_last(name, texture);
                return Err(err);
            }
        }

        if self.degraded {
            self.overwrite_last(name, texture);
            return Err(ParseError::allocation("texture table", self.entries.len() + 1));
        }

        let slot = self.entries.len();
        self.entries.push(Entry {
            name: name.to_string(),
            texture,
        });
        self.index.entry(name.to_string()).or_insert(slot);
        Ok(())
    }

    /// Define `alias` as another name for the texture bound to `existing`.
    ///
    /// An unknown `existing` name aliases the default texture.
    pub fn alias(&mut self, alias: &str, existing: &str) -> Result<()> {
        let texture = self.lookup(existing);
        self.define(alias, texture)
    }

    /// Resolve `name`, falling back to the default texture.
    pub fn lookup(&self, name: &str) -> TextureId {
        match self.index.get(name) {
            Some(&slot) => self.entries[slot].texture,
            None => {
                warn!("undefined texture `{}`, using default", name);
                self.default
            }
        }
    }

    /// The texture used for undefined names.
    pub fn default_texture(&self) -> TextureId {
        self.default
    }

    /// Number of defined names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no names are defined.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every name. Textures already handed to the scene are untouched.
    pub fn destroy(&mut self) {
        debug!("releasing {} texture names", self.entries.len());
        self.entries.clear();
        self.index.clear();
        self.degraded = false;
    }

    fn grow(&mut self) -> Result<()> {
        let current = self.entries.len();
        let mut wanted = current.max(1) * 2;
        if let Some(limit) = self.limit {
            if current >= limit {
                return Err(ParseError::allocation("texture table", wanted));
            }
            wanted = wanted.min(limit);
        }
        self.entries
            .try_reserve_exact(wanted - current)
            .map_err(|_| ParseError::allocation("texture table", wanted))?;
        debug!("texture table grown to {} slots", wanted);
        Ok(())
    }

    fn overwrite_last(&mut self, name: &str, texture: TextureId) {
        let Some(last) = self.entries.len().checked_sub(1) else {
            // No slot to reuse; every name resolves to the default instead.
            return;
        };
        let old = std::mem::replace(
            &mut self.entries[last],
            Entry {
                name: name.to_string(),
                texture,
            },
        );
        debug!("texture slot {} `{}` replaced by `{}`", last, old.name, name);
        self.index.insert(name.to_string(), last);
    }
}
