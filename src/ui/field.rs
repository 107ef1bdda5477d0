use std::collections::HashMap;

use ratatui::prelude::*;

use crate::assets::Sprite;
use crate::game::{BulletKind, Entity, Rect as Bounds, World, FIELD_HEIGHT, FIELD_WIDTH};

type DotMap = HashMap<(usize, usize), u8>;

fn braille_bit(sub_x: usize, sub_y: usize) -> u8 {
    match (sub_x, sub_y) {
        (0, 0) => 0x01,
        (0, 1) => 0x02,
        (0, 2) => 0x04,
        (0, 3) => 0x40,
        (1, 0) => 0x08,
        (1, 1) => 0x10,
        (1, 2) => 0x20,
        (1, 3) => 0x80,
        _ => 0,
    }
}

fn set_dot(map: &mut DotMap, bx: i32, by: i32, bw: i32, bh: i32) {
    if bx < 0 || by < 0 || bx >= bw || by >= bh {
        return;
    }
    let cx = bx as usize / 2;
    let cy = by as usize / 4;
    *map.entry((cx, cy)).or_insert(0) |= braille_bit(bx as usize % 2, by as usize % 4);
}

fn write_layer(grid: &mut [Vec<(char, Style)>], map: &DotMap, color: Color, bg: Color, bold: bool) {
    for (&(cx, cy), &bits) in map {
        let Some(cell) = grid.get_mut(cy).and_then(|row| row.get_mut(cx)) else {
            continue;
        };
        if bits != 0 {
            let ch = char::from_u32(0x2800 + bits as u32).unwrap_or(' ');
            let mut style = Style::default().fg(color).bg(bg);
            if bold {
                style = style.add_modifier(Modifier::BOLD);
            }
            *cell = (ch, style);
        }
    }
}

/// Maps world units onto braille dots (2x4 per terminal cell).
struct DotCanvas {
    bw: i32,
    bh: i32,
    sx: f32,
    sy: f32,
}

impl DotCanvas {
    fn new(width: usize, height: usize) -> Self {
        let bw = (width * 2) as i32;
        let bh = (height * 4) as i32;
        DotCanvas {
            bw,
            bh,
            sx: bw as f32 / FIELD_WIDTH,
            sy: bh as f32 / FIELD_HEIGHT,
        }
    }

    /// Filled rectangle, never thinner than one dot.
    fn fill(&self, map: &mut DotMap, r: Bounds) {
        let x0 = (r.x * self.sx).floor() as i32;
        let y0 = (r.y * self.sy).floor() as i32;
        let x1 = ((r.right() * self.sx).ceil() as i32).max(x0 + 1);
        let y1 = ((r.bottom() * self.sy).ceil() as i32).max(y0 + 1);
        for by in y0..y1 {
            for bx in x0..x1 {
                set_dot(map, bx, by, self.bw, self.bh);
            }
        }
    }
}

fn rgb(sprite: &Sprite) -> Color {
    let [r, g, b] = sprite.color;
    Color::Rgb(r, g, b)
}

pub struct FieldView<'a> {
    pub world: &'a World,
    pub player: &'a Sprite,
    pub alien: &'a Sprite,
    pub bullet: &'a Sprite,
    /// Frame counter used for blinking.
    pub frame: u64,
}

impl FieldView<'_> {
    pub fn lines(&self, width: usize, height: usize) -> Vec<Line<'static>> {
        let canvas = DotCanvas::new(width, height);
        let bg = Color::Rgb(0, 0, 5);
        let mut grid: Vec<Vec<(char, Style)>> = vec![vec![(' ', Style::default().bg(bg)); width]; height];

        let mut aliens = DotMap::new();
        for alien in self.world.formation().aliens.iter().filter(|a| a.is_alive()) {
            canvas.fill(&mut aliens, alien.bounds());
        }
        write_layer(&mut grid, &aliens, rgb(self.alien), bg, false);

        let mut shots = DotMap::new();
        let mut bombs = DotMap::new();
        for bullet in self.world.bullets().iter().filter(|b| b.is_alive()) {
            match bullet.kind {
                BulletKind::Player => canvas.fill(&mut shots, bullet.bounds()),
                BulletKind::Alien => canvas.fill(&mut bombs, bullet.bounds()),
            }
        }
        write_layer(&mut grid, &shots, rgb(self.bullet), bg, true);
        write_layer(&mut grid, &bombs, Color::Rgb(255, 100, 100), bg, true);

        let player = self.world.player();
        let blink_off = player.is_invulnerable() && (self.frame / 6) % 2 == 1;
        if player.is_alive() && !blink_off {
            let mut ship = DotMap::new();
            canvas.fill(&mut ship, player.bounds());
            write_layer(&mut grid, &ship, rgb(self.player), bg, true);
        }

        if let Some(ground) = grid.last_mut() {
            for cell in ground.iter_mut().filter(|c| c.0 == ' ') {
                *cell = ('\u{2500}', Style::default().fg(Color::Rgb(40, 80, 40)).bg(bg));
            }
        }

        grid.into_iter()
            .map(|row| {
                let spans: Vec<Span<'static>> = row
                    .into_iter()
                    .map(|(ch, style)| Span::styled(String::from(ch), style))
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::Assets;
    use crate::config::Options;

    #[test]
    fn fill_covers_at_least_one_dot() {
        let canvas = DotCanvas::new(10, 5);
        let mut map = DotMap::new();
        canvas.fill(&mut map, Bounds::new(0.0, 0.0, 0.5, 0.5));
        assert_eq!(map.get(&(0, 0)), Some(&0x01));
    }

    #[test]
    fn field_draws_every_entity_layer() {
        let assets = Assets::placeholders();
        let world = World::new(&Options::default(), assets.sizes(), 3);
        let view = FieldView {
            world: &world,
            player: &assets.player,
            alien: &assets.alien,
            bullet: &assets.bullet,
            frame: 0,
        };
        let lines = view.lines(80, 30);
        assert_eq!(lines.len(), 30);
        let painted = |color: Color| {
            lines
                .iter()
                .flat_map(|l| l.spans.iter())
                .any(|s| s.style.fg == Some(color) && s.content != "\u{2500}")
        };
        assert!(painted(Color::Rgb(0, 255, 0)), "player missing");
        assert!(painted(Color::Rgb(255, 0, 0)), "aliens missing");
    }
}
