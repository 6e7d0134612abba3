// What you SEE:
// • A glittery heart on a pale pink page.
// • Hold Left Mouse and drag over the heart to scratch it away.
// • Past the reveal threshold the rest clears, confetti bursts out of the
//   heart and the "ADD TO CALENDAR" button fades in. ESC quits.
//
// Usage: scratch-heart [config.json]   (RUST_LOG=debug for more output)

mod config;
mod draw;
mod error;
mod fx;
mod heart;
mod music;
mod page;
mod raster;
mod scratch;
mod surface;
mod texture;
mod types;

use std::path::PathBuf;
use std::time::Instant;

use log::{info, warn};

use config::Config;
use draw::Drawer;
use error::Error;
use fx::{Burst, Confetti};
use heart::HeartPath;
use music::{NoAudioOutput, Soundtrack};
use page::{Layout, Page, Pointer, Stroke};
use scratch::{ScratchCard, ScratchSettings};
use surface::ScratchSurface;
use texture::TextureLoader;
use types::{Colour, FrameBuffer, Point};

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = Config::load(config_path.as_deref());

    /* --- Geometry + cover ---
       Visual: nothing yet; the heart is drawn into the surface below. */
    let heart = HeartPath::parse(&config.heart_path)?;
    let fallback = Colour::from_hex(&config.fallback_fill).unwrap_or_else(|e| {
        warn!("{e}; using #fff5f8");
        Colour::rgb(0xff, 0xf5, 0xf8)
    });
    let surface = ScratchSurface::new(config.surface_size, &heart, fallback, config.texture_offset_y);

    /* --- Texture: decode in the background, draw with the fallback now ---
       Visual: flat pale heart first, glitter pops in when the file is ready. */
    let mut texture = TextureLoader::spawn(config.texture_path.clone(), config.surface_size);
    let settings = ScratchSettings {
        brush_radius: config.brush_radius,
        check_interval: config.check_interval(),
        threshold: config.reveal_threshold,
        estimated_total: config.estimated_total,
    };
    let mut card = ScratchCard::new(surface, settings, texture.state());

    /* --- Page around the card --- */
    let layout = Layout::new((config.window_width, config.window_height), config.surface_size);
    let colors = config
        .confetti
        .colors
        .iter()
        .filter_map(|c| Colour::from_hex(c).map_err(|e| warn!("confetti: {e}")).ok())
        .collect();
    let burst = Burst {
        particle_count: config.confetti.particle_count,
        spread: config.confetti.spread,
        origin: (0.5, 0.5),
        colors,
    };
    let mut page = Page::new(layout, &heart, burst);
    let layout = page.layout().clone();
    let mut confetti = Confetti::new();

    /* --- Music: try now, retry once on the first press --- */
    let mut soundtrack = config.music_path.clone().map(|track| Soundtrack::new(NoAudioOutput::new(track)));
    if let Some(track) = soundtrack.as_mut() {
        track.start();
    }

    let mut drawer = Drawer::new("Scratch Heart", config.window_width, config.window_height)?;
    let mut screen = FrameBuffer::new(config.window_width, config.window_height);

    let mut pointer = Pointer::new();
    let mut last_frame_time = Instant::now();

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        let now = Instant::now();
        let dt = (now - last_frame_time).as_secs_f32();
        last_frame_time = now;

        /* 1) Texture settled (loaded or failed)? Redraw the cover once. */
        if texture.poll() {
            card.rerender(texture.state());
        }

        /* 2) Pointer */
        let pos = drawer.mouse_pos().map(|(x, y)| Point::new(x, y));
        let event = pointer.update(pos, drawer.left_mouse_down(), &layout);

        if event.pressed {
            if let Some(track) = soundtrack.as_mut() {
                track.on_interaction();
            }
        }
        if let Some(p) = event.click {
            page.click(p);
        }
        match event.stroke {
            Stroke::Start => card.press(),
            Stroke::End => card.release(),
            Stroke::Unchanged => {}
        }
        if let Some(p) = event.scratch {
            if card.drag(p, now) {
                let fired = page.on_finished(now);
                confetti.fire(&fired, layout.viewport.0, layout.viewport.1);
                info!("confetti: {} particles", fired.particle_count);
            }
        }

        /* 3) Page, cover, button, confetti on top */
        page.compose(&mut screen, &card, now);
        if confetti.is_active() {
            confetti.update_and_render(&mut screen, dt);
        }

        /* 4) Present */
        drawer.present(&screen)?;
    }

    Ok(())
}
