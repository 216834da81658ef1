//! Tiles, pixmaps and collidable sprites
//!
//! Image decoding and atlas parsing happen outside the simulation. The host
//! hands decoded pixels and tile regions to a [`TileSheet`] (or any other
//! [`TileLookup`]) and sprites are built from that.

use std::collections::HashMap;

use glam::{UVec2, Vec2};

use super::collision::CollisionMask;
use crate::error::SpriteError;

/// Channel layout of decoded pixel data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Gray,
    GrayAlpha,
    Rgb,
    Rgba,
}

impl PixelFormat {
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Gray => 1,
            PixelFormat::GrayAlpha => 2,
            PixelFormat::Rgb => 3,
            PixelFormat::Rgba => 4,
        }
    }
}

/// Decoded image, rows top to bottom
#[derive(Debug, Clone)]
pub struct Pixmap {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub pixels: Vec<u8>,
}

impl Pixmap {
    pub fn new(width: u32, height: u32, format: PixelFormat, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            format,
            pixels,
        }
    }

    /// Build an RGBA pixmap from packed 32-bit pixels (alpha in the top byte)
    pub fn from_rgba_pixels(width: u32, height: u32, pixels: &[u32]) -> Self {
        let bytes = pixels.iter().flat_map(|px| px.to_le_bytes()).collect();
        Self::new(width, height, PixelFormat::Rgba, bytes)
    }

    pub fn size(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }
}

/// A named rectangular region of one image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub name: String,
    /// Index of the source image in its sheet
    pub image: usize,
    /// Top-left pixel of the region
    pub position: UVec2,
    pub size: UVec2,
}

/// Source of tiles and the pixels behind them
pub trait TileLookup {
    fn find_tile(&self, name: &str) -> Option<&Tile>;
    fn pixmap(&self, image: usize) -> Option<&Pixmap>;
}

/// In-memory tile sheet: a list of images plus named regions within them
#[derive(Debug, Clone, Default)]
pub struct TileSheet {
    images: Vec<Pixmap>,
    tiles: HashMap<String, Tile>,
}

impl TileSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an image, returning its index
    pub fn add_image(&mut self, pixmap: Pixmap) -> usize {
        self.images.push(pixmap);
        self.images.len() - 1
    }

    /// Register a named region of an already added image
    pub fn add_tile(
        &mut self,
        name: impl Into<String>,
        image: usize,
        position: UVec2,
        size: UVec2,
    ) -> Result<&Tile, SpriteError> {
        if image >= self.images.len() {
            return Err(SpriteError::MissingImage { image });
        }
        let name = name.into();
        let tile = Tile {
            name: name.clone(),
            image,
            position,
            size,
        };
        Ok(self.tiles.entry(name).insert_entry(tile).into_mut())
    }
}

impl TileLookup for TileSheet {
    fn find_tile(&self, name: &str) -> Option<&Tile> {
        self.tiles.get(name)
    }

    fn pixmap(&self, image: usize) -> Option<&Pixmap> {
        self.images.get(image)
    }
}

/// A tile together with its collision mask
#[derive(Debug, Clone)]
pub struct Sprite {
    tile: Tile,
    mask: CollisionMask,
}

impl Sprite {
    pub fn new(tile: Tile, pixmap: &Pixmap) -> Result<Self, SpriteError> {
        let mask = CollisionMask::from_region(pixmap, tile.position, tile.size)?;
        log::trace!("collision mask for {}:\n{}", tile.name, mask.to_ascii());
        Ok(Self { tile, mask })
    }

    /// Look up `name` and build its sprite
    pub fn from_lookup(lookup: &impl TileLookup, name: &str) -> Result<Self, SpriteError> {
        let tile = lookup
            .find_tile(name)
            .ok_or_else(|| SpriteError::UnknownTile(name.to_string()))?;
        let pixmap = lookup
            .pixmap(tile.image)
            .ok_or(SpriteError::MissingImage { image: tile.image })?;
        Self::new(tile.clone(), pixmap)
    }

    pub fn tile(&self) -> &Tile {
        &self.tile
    }

    pub fn mask(&self) -> &CollisionMask {
        &self.mask
    }

    /// Pixel overlap test against `other` placed at `offset` (in tile pixels)
    /// from this sprite. See [`CollisionMask::collides_with`].
    #[inline]
    pub fn collides_with(&self, other: &Sprite, offset: Vec2) -> bool {
        self.mask.collides_with(&other.mask, offset)
    }
}
