use super::phase_banner;
use crate::renderer::color::Rgba;
use crate::renderer::draw::DrawList;
use crate::sim::game2048::Game2048;
use crate::sim::game2048::consts::*;

const BOARD: Rgba = Rgba::hex(0xbbada0);
const EMPTY: Rgba = Rgba::hex(0xcdc1b4);
const DARK_TEXT: Rgba = Rgba::hex(0x776e65);
const TILE_GAP: f32 = 10.0;

pub fn tile_color(value: u32) -> Rgba {
    match value {
        0 => EMPTY,
        2 => Rgba::hex(0xeee4da),
        4 => Rgba::hex(0xede0c8),
        8 => Rgba::hex(0xf2b179),
        16 => Rgba::hex(0xf59563),
        32 => Rgba::hex(0xf67c5f),
        64 => Rgba::hex(0xf65e3b),
        128 => Rgba::hex(0xedcf72),
        256 => Rgba::hex(0xedcc61),
        512 => Rgba::hex(0xedc850),
        1024 => Rgba::hex(0xedc53f),
        2048 => Rgba::hex(0xedc22e),
        _ => Rgba::hex(0x3c3a32),
    }
}

pub fn paint(game: &Game2048, list: &mut DrawList) {
    let (w, h) = (list.width(), list.height());
    list.fill_rect(0.0, 0.0, w, h, BOARD);

    let cell = (w.min(h) - 2.0 * PADDING) / SIZE as f32;
    for (r, row) in game.board.iter().enumerate() {
        for (c, &value) in row.iter().enumerate() {
            let x = PADDING + c as f32 * cell + TILE_GAP / 2.0;
            let y = PADDING + r as f32 * cell + TILE_GAP / 2.0;
            let side = cell - TILE_GAP;
            list.fill_rect(x, y, side, side, tile_color(value));
            if value > 0 {
                let text_color = if value <= 4 { DARK_TEXT } else { Rgba::WHITE };
                let size = if value >= 1024 { 28.0 } else { 36.0 };
                list.text_centered(x + side / 2.0, y + side / 2.0 + size / 3.0, value.to_string(), size, text_color);
            }
        }
    }

    list.text(PADDING, 15.0, format!("Score: {}", game.score), 14.0, DARK_TEXT);
    list.text(w - 120.0, 15.0, format!("Best: {}", game.high_score), 14.0, DARK_TEXT);

    phase_banner(list, game.phase, "2048", "Slide tiles with the arrow keys", game.score);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sixteen_tiles_and_values() {
        let mut game = Game2048::new(2, 0);
        game.start();
        let mut list = DrawList::new(CANVAS_WIDTH, CANVAS_HEIGHT);
        paint(&game, &mut list);
        // Board plus one rect per cell
        assert_eq!(list.foreground().len(), 1 + SIZE * SIZE);
        let labelled = list.texts().iter().filter(|t| t.text == "2" || t.text == "4").count();
        assert_eq!(labelled, 2);
    }

    #[test]
    fn test_unknown_large_tiles_use_fallback_colour() {
        assert_eq!(tile_color(4096), tile_color(8192));
        assert_ne!(tile_color(2), tile_color(2048));
    }
}
