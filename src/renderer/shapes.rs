//! Geometry generation for sprite quads and debug lines

use glam::{UVec2, Vec2};

use super::vertex::{LineVertex, SpriteVertex, colors};
use crate::error::SpriteError;
use crate::sim::{Frame, Tile, TileLookup};

/// Two triangles per quad, in corner order of [`sprite_quad`]
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

/// Four corners of a tile drawn centred on `position` at `scale`.
///
/// Corner order is bottom-left, top-left, top-right, bottom-right in world
/// space (y up). Texture rows run top to bottom, so `v` is flipped.
pub fn sprite_quad(tile: &Tile, image_size: UVec2, position: Vec2, scale: f32) -> [SpriteVertex; 4] {
    let half = 0.5 * tile.size.as_vec2() * scale;

    let image = image_size.max(UVec2::ONE).as_vec2();
    let uv_min = tile.position.as_vec2() / image;
    let uv_max = (tile.position + tile.size).as_vec2() / image;

    let corner = |dx: f32, dy: f32, u: f32, v: f32| {
        SpriteVertex::new(position.x + dx * half.x, position.y + dy * half.y, u, v)
    };
    [
        corner(-1.0, -1.0, uv_min.x, uv_max.y),
        corner(-1.0, 1.0, uv_min.x, uv_min.y),
        corner(1.0, 1.0, uv_max.x, uv_min.y),
        corner(1.0, -1.0, uv_max.x, uv_max.y),
    ]
}

/// Line strip through `points`
pub fn line_strip(points: &[Vec2], color: [f32; 4]) -> Vec<LineVertex> {
    points
        .iter()
        .map(|p| LineVertex::new(p.x, p.y, color))
        .collect()
}

/// Vertex data for one frame
#[derive(Debug, Clone, Default)]
pub struct SpriteBatch {
    pub vertices: Vec<SpriteVertex>,
    pub indices: Vec<u32>,
    /// One strip per active wave trajectory
    pub lines: Vec<Vec<LineVertex>>,
    pub clear_color: [f32; 4],
}

impl SpriteBatch {
    pub fn sprite_count(&self) -> usize {
        self.vertices.len() / 4
    }

    /// Raw bytes of the sprite vertex buffer
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    fn push_quad(&mut self, quad: [SpriteVertex; 4]) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&quad);
        self.indices.extend(QUAD_INDICES.iter().map(|i| base + i));
    }
}

/// Build the sprite batch for `frame`, in draw order
pub fn frame_batch(frame: &Frame<'_>, lookup: &impl TileLookup, scale: f32) -> Result<SpriteBatch, SpriteError> {
    let mut batch = SpriteBatch {
        clear_color: if frame.flash {
            colors::COLLISION_FLASH
        } else {
            colors::BACKGROUND
        },
        ..Default::default()
    };

    batch.lines = frame
        .trajectories
        .iter()
        .map(|points| line_strip(points, colors::TRAJECTORY))
        .collect();

    for sprite in &frame.sprites {
        let pixmap = lookup
            .pixmap(sprite.tile.image)
            .ok_or(SpriteError::MissingImage {
                image: sprite.tile.image,
            })?;
        batch.push_quad(sprite_quad(sprite.tile, pixmap.size(), sprite.position, scale));
    }

    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Pixmap, SpriteDraw, TileSheet};

    fn sheet() -> TileSheet {
        let mut sheet = TileSheet::new();
        let image = sheet.add_image(Pixmap::from_rgba_pixels(32, 16, &[0; 512]));
        sheet
            .add_tile("mame.png", image, UVec2::new(16, 0), UVec2::new(16, 8))
            .unwrap();
        sheet
    }

    #[test]
    fn test_sprite_quad_corners_and_uvs() {
        let sheet = sheet();
        let tile = sheet.find_tile("mame.png").unwrap();
        let quad = sprite_quad(tile, UVec2::new(32, 16), Vec2::new(100.0, 50.0), 2.0);

        assert_eq!(quad[0], SpriteVertex::new(84.0, 42.0, 0.5, 0.5));
        assert_eq!(quad[1], SpriteVertex::new(84.0, 58.0, 0.5, 0.0));
        assert_eq!(quad[2], SpriteVertex::new(116.0, 58.0, 1.0, 0.0));
        assert_eq!(quad[3], SpriteVertex::new(116.0, 42.0, 1.0, 0.5));
    }

    #[test]
    fn test_frame_batch() {
        let sheet = sheet();
        let tile = sheet.find_tile("mame.png").unwrap();
        let path = [Vec2::ZERO, Vec2::new(1.0, 1.0)];
        let frame = Frame {
            sprites: vec![
                SpriteDraw {
                    tile,
                    position: Vec2::ZERO,
                },
                SpriteDraw {
                    tile,
                    position: Vec2::new(10.0, 0.0),
                },
            ],
            colliding: true,
            flash: true,
            trajectories: vec![&path[..]],
        };

        let batch = frame_batch(&frame, &sheet, 2.0).unwrap();
        assert_eq!(batch.sprite_count(), 2);
        assert_eq!(batch.indices, vec![0, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7]);
        assert_eq!(batch.vertex_bytes().len(), 8 * std::mem::size_of::<SpriteVertex>());
        assert_eq!(batch.index_bytes().len(), 12 * 4);
        assert_eq!(batch.clear_color, colors::COLLISION_FLASH);
        assert_eq!(batch.lines.len(), 1);
        assert_eq!(batch.lines[0][1].position, [1.0, 1.0]);
    }

    #[test]
    fn test_frame_batch_missing_image() {
        let sheet = sheet();
        let orphan = Tile {
            name: "orphan.png".to_string(),
            image: 7,
            position: UVec2::ZERO,
            size: UVec2::ONE,
        };
        let frame = Frame {
            sprites: vec![SpriteDraw {
                tile: &orphan,
                position: Vec2::ZERO,
            }],
            ..Default::default()
        };
        assert_eq!(
            frame_batch(&frame, &sheet, 1.0).unwrap_err(),
            SpriteError::MissingImage { image: 7 }
        );
    }
}
