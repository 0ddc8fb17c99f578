use super::{hud_panel, phase_banner};
use crate::renderer::color::{Rgba, palette};
use crate::renderer::draw::DrawList;
use crate::sim::memory::Memory;

const CARD_BACK: Rgba = Rgba::hex(0x2d3561);
const CARD_GAP: f32 = 6.0;

/// Distinct face colour per pair value
fn face_color(value: u32, pairs: usize) -> Rgba {
    Rgba::hsl(value as f32 * 360.0 / pairs.max(1) as f32, 0.7, 0.55)
}

pub fn paint(game: &Memory, list: &mut DrawList) {
    let (w, h) = (list.width(), list.height());
    list.fill_rect(0.0, 0.0, w, h, palette::BOARD_BACKGROUND);

    let pairs = game.pairs();
    for (i, card) in game.cards.iter().enumerate() {
        let rect = game.card_rect(i);
        let (x, y) = (rect.min.x + CARD_GAP / 2.0, rect.min.y + CARD_GAP / 2.0);
        let (cw, ch) = (rect.size.x - CARD_GAP, rect.size.y - CARD_GAP);
        if card.face_up() {
            let color = face_color(card.value, pairs);
            let fill = if card.matched { color.with_alpha(0.45) } else { color };
            list.fill_rect(x, y, cw, ch, fill);
            let center = rect.center();
            list.text_centered(center.x, center.y + 8.0, (card.value + 1).to_string(), 24.0, Rgba::WHITE);
        } else {
            list.fill_rect(x, y, cw, ch, CARD_BACK);
        }
        let border = if game.first == Some(i) {
            palette::ACCENT_ORANGE
        } else {
            Rgba::WHITE.with_alpha(0.2)
        };
        list.stroke_rect(x, y, cw, ch, 2.0, border);
    }

    hud_panel(list, w - 170.0, 4.0, 166.0, 14.0);
    list.text(
        w - 165.0,
        16.0,
        format!("Score: {}  Pairs: {}/{}", game.score, game.pairs_found, pairs),
        12.0,
        Rgba::WHITE,
    );

    phase_banner(list, game.phase, "Memory", "Find every matching pair", game.score);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Difficulty;
    use crate::sim::memory::consts::*;

    #[test]
    fn test_open_card_shows_value() {
        let mut game = Memory::new(4, Difficulty::Easy, 0);
        game.start();
        game.flip(0);
        let mut list = DrawList::new(CANVAS_WIDTH, CANVAS_HEIGHT);
        paint(&game, &mut list);
        let label = (game.cards[0].value + 1).to_string();
        assert!(list.texts().iter().any(|t| t.text == label));
        // One outline per card
        let outlines = list
            .foreground()
            .iter()
            .filter(|c| matches!(c.shape, crate::renderer::draw::Shape::RectOutline { .. }))
            .count();
        assert_eq!(outlines, game.cards.len());
    }
}
