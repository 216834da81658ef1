//! Wave Dodge entry point
//!
//! Runs the simulation headless: loads settings and the level, builds
//! placeholder sprites in memory, and drives the world with a scripted input
//! pattern at a fixed 60 Hz frame time. Window creation and GPU submission are
//! left to a windowed host.

use std::error::Error;

use glam::UVec2;

use wave_dodge::Settings;
use wave_dodge::consts::{MS_PER_TIC, SPRITE_SCALE};
use wave_dodge::renderer::frame_batch;
use wave_dodge::sim::{DPad, Level, Pixmap, Sprite, TileSheet, World, WorldSprites};

const SETTINGS_PATH: &str = "wave-dodge.json";
const TILE_SIZE: u32 = 16;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    log::info!("Wave Dodge (headless) starting...");

    let mut settings = Settings::load_or_default(SETTINGS_PATH);
    if let Some(level_path) = std::env::args().nth(1) {
        settings.level_path = level_path;
    }

    let level = Level::load(&settings.level_path)?;
    let sheet = placeholder_sheet(&settings)?;
    let sprites = WorldSprites {
        player: Sprite::from_lookup(&sheet, &settings.player_tile)?,
        foe: Sprite::from_lookup(&sheet, &settings.foe_tile)?,
    };

    let mut world = World::new(&level, sprites, settings.player_start(), settings.debug);

    let mut was_colliding = false;
    let mut hit_frames = 0u32;
    let mut peak_foes = 0usize;
    for frame_index in 0..settings.demo_frames {
        world.set_dpad(scripted_input(frame_index));
        world.advance(MS_PER_TIC);

        let frame = world.render();
        let batch = frame_batch(&frame, &sheet, SPRITE_SCALE)?;

        if frame.colliding {
            hit_frames += 1;
        }
        if frame.colliding != was_colliding {
            log::info!(
                "tic {}: player {} (player at {}, {} sprites in batch)",
                world.tic(),
                if frame.colliding { "hit" } else { "clear" },
                world.player().position,
                batch.sprite_count()
            );
            was_colliding = frame.colliding;
        }
        peak_foes = peak_foes.max(world.foes().len());
    }

    log::info!(
        "Finished after {} tics: {} foes spawned, peak {} on screen, hit for {} frames",
        world.tic(),
        world.foes_spawned(),
        peak_foes,
        hit_frames
    );
    Ok(())
}

/// Circle the player around by cycling the d-pad once a second
fn scripted_input(frame_index: u32) -> DPad {
    const PATTERN: [u8; 4] = [DPad::LEFT, DPad::UP, DPad::RIGHT, DPad::DOWN];
    DPad::from_bits(PATTERN[(frame_index / 60) as usize % PATTERN.len()])
}

/// Opaque disc filling one tile; `color` is `0x00BBGGRR`
fn disc(color: u32) -> Vec<u32> {
    let radius = TILE_SIZE as f32 / 2.0;
    (0..TILE_SIZE * TILE_SIZE)
        .map(|i| {
            let x = (i % TILE_SIZE) as f32 + 0.5 - radius;
            let y = (i / TILE_SIZE) as f32 + 0.5 - radius;
            if x * x + y * y <= radius * radius {
                0xff00_0000 | color
            } else {
                0
            }
        })
        .collect()
}

/// Both sprites side by side in one image, named as the settings expect
fn placeholder_sheet(settings: &Settings) -> Result<TileSheet, Box<dyn Error>> {
    let player = disc(0x00ff_c040);
    let foe = disc(0x0040_40ff);

    let mut pixels = Vec::with_capacity(player.len() * 2);
    for row in 0..TILE_SIZE as usize {
        let span = row * TILE_SIZE as usize..(row + 1) * TILE_SIZE as usize;
        pixels.extend_from_slice(&player[span.clone()]);
        pixels.extend_from_slice(&foe[span]);
    }

    let mut sheet = TileSheet::new();
    let image = sheet.add_image(Pixmap::from_rgba_pixels(2 * TILE_SIZE, TILE_SIZE, &pixels));
    let size = UVec2::splat(TILE_SIZE);
    sheet.add_tile(settings.player_tile.as_str(), image, UVec2::ZERO, size)?;
    sheet.add_tile(settings.foe_tile.as_str(), image, UVec2::new(TILE_SIZE, 0), size)?;
    Ok(sheet)
}
