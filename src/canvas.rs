//! Canvas collaborators: where finished pixels go.
//!
//! The renderer only talks to the [`Canvas`] trait: clear at frame start,
//! per-pixel draw while committing, present at frame end, plus input
//! polling for the demo loop. [`SdlCanvas`] implements it over SDL2 with a
//! streaming ARGB8888 texture; [`BufferCanvas`] is a headless stand-in for
//! tests.

use sdl2::event::Event;
use sdl2::keyboard::{KeyboardState, Keycode, Scancode};
use sdl2::pixels::PixelFormatEnum;
use sdl2::rect::Rect;

use crate::colors;

/// Keys the demo scenes care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    W,
    A,
    S,
    D,
    Q,
    E,
}

/// A presentable pixel surface with input polling.
pub trait Canvas {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Reset every pixel to the background color.
    fn clear(&mut self);
    /// Write one ARGB8888 pixel. Callers guarantee in-bounds coordinates.
    fn draw(&mut self, x: u32, y: u32, color: u32);
    /// Show the current frame.
    fn present(&mut self);
    /// Pump window/input events. Returns false once quit was requested
    /// (window close or Escape).
    fn check_input(&mut self) -> bool;
    fn key_pressed(&self, key: Key) -> bool;
}

/// SDL2-backed window canvas.
pub struct SdlCanvas {
    canvas: sdl2::render::Canvas<sdl2::video::Window>,
    texture_creator: Box<sdl2::render::TextureCreator<sdl2::video::WindowContext>>,
    texture: sdl2::render::Texture<'static>,
    event_pump: sdl2::EventPump,
    buffer: Vec<u32>,
    width: u32,
    height: u32,
}

impl SdlCanvas {
    pub fn create(width: u32, height: u32, title: &str) -> Result<Self, String> {
        let sdl_context = sdl2::init()?;
        let video_subsystem = sdl_context.video()?;

        let window = video_subsystem
            .window(title, width, height)
            .position_centered()
            .build()
            .map_err(|e| e.to_string())?;

        let canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
        let texture_creator = Box::new(canvas.texture_creator());
        let event_pump = sdl_context.event_pump()?;

        // SAFETY: texture_creator is heap-allocated and lives as long as
        // SdlCanvas. We ensure texture is dropped before texture_creator by
        // struct field order.
        let texture_creator_ref: &'static sdl2::render::TextureCreator<sdl2::video::WindowContext> =
            unsafe { &*(texture_creator.as_ref() as *const _) };
        let texture = texture_creator_ref
            .create_texture_streaming(PixelFormatEnum::ARGB8888, width, height)
            .map_err(|e| e.to_string())?;

        log::info!("created {width}x{height} SDL canvas: {title}");
        Ok(Self {
            canvas,
            texture_creator,
            texture,
            event_pump,
            buffer: vec![colors::BACKGROUND; (width * height) as usize],
            width,
            height,
        })
    }
}

impl Canvas for SdlCanvas {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self) {
        self.buffer.fill(colors::BACKGROUND);
    }

    #[inline]
    fn draw(&mut self, x: u32, y: u32, color: u32) {
        self.buffer[(y * self.width + x) as usize] = color;
    }

    fn present(&mut self) {
        let pitch = (self.width * 4) as usize;
        // Reinterpret the u32 pixels as the byte stream SDL expects
        let bytes = unsafe {
            std::slice::from_raw_parts(self.buffer.as_ptr() as *const u8, self.buffer.len() * 4)
        };
        if let Err(e) = self.texture.update(None, bytes, pitch) {
            log::error!("texture update failed: {e}");
            return;
        }
        self.canvas.clear();
        let dst = Rect::new(0, 0, self.width, self.height);
        if let Err(e) = self.canvas.copy(&self.texture, None, Some(dst)) {
            log::error!("texture copy failed: {e}");
            return;
        }
        self.canvas.present();
    }

    fn check_input(&mut self) -> bool {
        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => return false,
                _ => {}
            }
        }
        true
    }

    fn key_pressed(&self, key: Key) -> bool {
        let scancode = match key {
            Key::W => Scancode::W,
            Key::A => Scancode::A,
            Key::S => Scancode::S,
            Key::D => Scancode::D,
            Key::Q => Scancode::Q,
            Key::E => Scancode::E,
        };
        KeyboardState::new(&self.event_pump).is_scancode_pressed(scancode)
    }
}

/// Headless canvas that keeps pixels in memory. Used by tests and the
/// serial/parallel equivalence check.
pub struct BufferCanvas {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl BufferCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![colors::BACKGROUND; (width * height) as usize],
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> u32 {
        self.pixels[(y * self.width + x) as usize]
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }
}

impl Canvas for BufferCanvas {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self) {
        self.pixels.fill(colors::BACKGROUND);
    }

    #[inline]
    fn draw(&mut self, x: u32, y: u32, color: u32) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    fn present(&mut self) {}

    fn check_input(&mut self) -> bool {
        true
    }

    fn key_pressed(&self, _key: Key) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_canvas_draw_and_clear() {
        let mut canvas = BufferCanvas::new(8, 8);
        canvas.draw(3, 4, 0xFF123456);
        assert_eq!(canvas.pixel(3, 4), 0xFF123456);
        canvas.clear();
        assert_eq!(canvas.pixel(3, 4), colors::BACKGROUND);
    }
}
