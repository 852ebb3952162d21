// SPDX-License-Identifier: MIT
//
// glif — animated compositor demo.
//
// Builds a small scene on a centered Screen: a framed canvas, a
// bouncing sprite, and blinking markers in the corners. Each frame is
// redrawn differentially (cursor-up over the previous footprint, per
// row diff-compressed SGR), so the terminal traffic stays small even
// at ~30 fps.
//
//   q / Escape / Ctrl-C  → quit
//   arrows               → nudge the sprite

use std::process;

use glif_geom::{Align, Rect, Size, Vec2};
use glif_term::drawable::{self, Blinker, Frame, Sprite};
use glif_term::input::{self, Key, KeyEvent, Modifiers};
use glif_term::terminal::{self, Terminal};
use glif_term::{Glyph, Mode, Screen};

/// Frame period for the animation loop, ~30 fps.
const TICK_MS: i32 = 33;

const CANVAS: Size = Size::new(60, 18);

fn main() {
    if let Err(err) = run() {
        eprintln!("glif: {err}");
        process::exit(1);
    }
}

fn run() -> std::io::Result<()> {
    if !terminal::is_tty() {
        eprintln!("glif: stdin is not a terminal");
        process::exit(1);
    }

    let mut term = Terminal::new();
    term.enter()?;

    let mut screen = Screen::new(CANVAS, Glyph::DEFAULT).with_align(Align::Center, Align::Center);

    let frame = Frame::new(
        Rect::sized(CANVAS),
        drawable::TILES_LIGHT,
        Glyph::DEFAULT.with_fg(6),
    )
    .map_err(std::io::Error::other)?;

    let mut sprite = Sprite::new(
        Vec2::new(4, 4),
        glif_term::Image::parse("\x1b[38;5;11m /\\ \n<  >\n \\/ "),
    );
    let mut velocity = Vec2::new(1, 1);

    let blinkers = corner_blinkers();

    loop {
        sprite.translate(velocity);
        bounce(&mut sprite, &mut velocity);

        screen.fill(Glyph::DEFAULT);
        screen.draw(&sprite);
        screen.draw(&frame);
        for blinker in &blinkers {
            blinker.update(1);
            screen.draw(blinker);
        }
        screen.display()?;

        match input::poll_key(TICK_MS)? {
            Some(ev) if is_quit(ev) => break,
            Some(KeyEvent { key: Key::Up, .. }) => velocity.y = -1,
            Some(KeyEvent { key: Key::Down, .. }) => velocity.y = 1,
            Some(KeyEvent { key: Key::Left, .. }) => velocity.x = -1,
            Some(KeyEvent { key: Key::Right, .. }) => velocity.x = 1,
            _ => {}
        }
    }

    term.leave()
}

fn is_quit(ev: KeyEvent) -> bool {
    matches!(ev.key, Key::Char('q') | Key::Escape)
        || (ev.key == Key::Char('c') && ev.modifiers.contains(Modifiers::CTRL))
}

/// Reflect the sprite's velocity off the canvas interior (one cell in
/// from the frame border on each side).
fn bounce(sprite: &mut Sprite, velocity: &mut Vec2) {
    let size = sprite.image().size();
    let max_x = i32::from(CANVAS.w) - 1 - i32::from(size.w);
    let max_y = i32::from(CANVAS.h) - 1 - i32::from(size.h);
    let mut pos = sprite.pos();

    if pos.x <= 1 || pos.x >= max_x {
        velocity.x = -velocity.x;
        pos.x = pos.x.clamp(1, max_x);
    }
    if pos.y <= 1 || pos.y >= max_y {
        velocity.y = -velocity.y;
        pos.y = pos.y.clamp(1, max_y);
    }
    sprite.set_pos(pos);
}

fn corner_blinkers() -> [Blinker; 4] {
    let glyph = Glyph::new('*').with_fg(9).with_mode(Mode::INTENSE);
    let w = i32::from(CANVAS.w);
    let h = i32::from(CANVAS.h);
    [
        Blinker::new(Vec2::new(1, 1), glyph, 15),
        Blinker::new(Vec2::new(w - 2, 1), glyph, 15),
        Blinker::new(Vec2::new(1, h - 2), glyph, 15),
        Blinker::new(Vec2::new(w - 2, h - 2), glyph, 15),
    ]
}
