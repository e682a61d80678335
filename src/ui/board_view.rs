//! Board rendering for the Nine Men's Morris GUI

use crate::board::{neighbors, MILL_LINES};
use crate::{BoardState, Pos, Stone};
use egui::{Color32, CornerRadius, Painter, Pos2, Rect, Sense, Stroke, Vec2};

use super::game_state::{GameState, Selection};
use super::theme::*;

/// Fraction of a cell within which a click snaps to a point
const HIT_RADIUS_RATIO: f32 = 0.45;

/// Board view handles rendering and input for the game board
pub struct BoardView {
    /// Cached cell size for coordinate calculations
    cell_size: f32,
    /// Board drawing area
    board_rect: Rect,
}

impl Default for BoardView {
    fn default() -> Self {
        Self {
            cell_size: 80.0,
            board_rect: Rect::NOTHING,
        }
    }
}

impl BoardView {
    /// Render the board and return the clicked point if any
    pub fn show(&mut self, ui: &mut egui::Ui, state: &GameState) -> Option<Pos> {
        let available_size = ui.available_size();
        let board_size = available_size.x.min(available_size.y) - 20.0;
        self.cell_size = (board_size - 2.0 * BOARD_MARGIN) / (GRID_CELLS as f32 - 1.0);

        let (response, painter) = ui.allocate_painter(Vec2::new(board_size, board_size), Sense::click());
        self.board_rect = response.rect;

        let board = state.board();

        painter.rect_filled(self.board_rect, CornerRadius::same(4), BOARD_BG);
        self.draw_lines(&painter);
        self.draw_mills(&painter, board);
        self.draw_points(&painter);
        self.draw_stones(&painter, board);

        if let Some(mv) = state.last_move() {
            self.draw_last_move_marker(&painter, mv.to);
        }

        match state.selection {
            Selection::Piece(pos) => self.draw_ring(&painter, pos, SELECTION_RING),
            Selection::AwaitingCapture(mv) => {
                self.draw_hover_preview(&painter, mv.to, board.current_player());
                for pos in state.capture_candidates() {
                    self.draw_ring(&painter, pos, CAPTURE_RING);
                }
            }
            Selection::None => {}
        }

        if state.game_over.is_some() || !state.is_human_turn() || state.is_cpu_thinking() {
            return None;
        }

        let board_pos = response.hover_pos().and_then(|p| self.screen_to_board(p))?;
        if board.is_empty(board_pos) && !matches!(state.selection, Selection::AwaitingCapture(_)) {
            self.draw_hover_preview(&painter, board_pos, board.current_player());
        }

        response.clicked().then_some(board_pos)
    }

    /// Draw the three squares and their connecting lines
    fn draw_lines(&self, painter: &Painter) {
        let stroke = Stroke::new(GRID_LINE_WIDTH, GRID_LINE);

        for from in Pos::all() {
            for &to in neighbors(from) {
                // Each edge once
                if from < to {
                    painter.line_segment([self.board_to_screen(from), self.board_to_screen(to)], stroke);
                }
            }
        }
    }

    /// Highlight every complete mill
    fn draw_mills(&self, painter: &Painter, board: &BoardState) {
        let stroke = Stroke::new(GRID_LINE_WIDTH * 2.0, WIN_HIGHLIGHT);

        for line in &MILL_LINES {
            let owner = board.position_state(line[0]);
            if owner != Stone::Empty && line.iter().all(|&p| board.position_state(p) == owner) {
                painter.line_segment(
                    [self.board_to_screen(line[0]), self.board_to_screen(line[2])],
                    stroke,
                );
            }
        }
    }

    fn draw_points(&self, painter: &Painter) {
        for pos in Pos::all() {
            painter.circle_filled(self.board_to_screen(pos), POINT_RADIUS, POINT_MARK);
        }
    }

    fn draw_stones(&self, painter: &Painter, board: &BoardState) {
        for pos in Pos::all() {
            let stone = board.position_state(pos);
            if stone != Stone::Empty {
                self.draw_stone(painter, pos, stone);
            }
        }
    }

    /// Draw a single stone with shadow and shading
    fn draw_stone(&self, painter: &Painter, pos: Pos, stone: Stone) {
        let center = self.board_to_screen(pos);
        let radius = self.stone_radius();
        let shadow_offset = Vec2::new(2.0, 2.0);

        match stone {
            Stone::Black => {
                painter.circle_filled(
                    center + shadow_offset,
                    radius,
                    Color32::from_rgba_unmultiplied(0, 0, 0, 60),
                );
                painter.circle_filled(center, radius, BLACK_STONE);

                let highlight_offset = Vec2::new(-radius * 0.3, -radius * 0.3);
                painter.circle_filled(center + highlight_offset, radius * 0.2, BLACK_STONE_HIGHLIGHT);
            }
            Stone::White => {
                painter.circle_filled(
                    center + shadow_offset,
                    radius,
                    Color32::from_rgba_unmultiplied(0, 0, 0, 40),
                );
                painter.circle_filled(center, radius, WHITE_STONE);
                painter.circle_stroke(
                    center,
                    radius * 0.85,
                    Stroke::new(radius * 0.1, WHITE_STONE_SHADOW),
                );
            }
            Stone::Empty => {}
        }
    }

    fn draw_last_move_marker(&self, painter: &Painter, pos: Pos) {
        let center = self.board_to_screen(pos);
        painter.circle_filled(center, LAST_MOVE_MARKER_RADIUS, LAST_MOVE_MARKER);
    }

    fn draw_ring(&self, painter: &Painter, pos: Pos, color: Color32) {
        let center = self.board_to_screen(pos);
        painter.circle_stroke(center, self.stone_radius() + 3.0, Stroke::new(3.0, color));
    }

    /// Translucent stone of the side to move
    fn draw_hover_preview(&self, painter: &Painter, pos: Pos, turn: Stone) {
        let color = match turn {
            Stone::Black => Color32::from_rgba_unmultiplied(20, 20, 20, 80),
            Stone::White => Color32::from_rgba_unmultiplied(240, 240, 240, 80),
            Stone::Empty => hover_valid(),
        };
        painter.circle_filled(self.board_to_screen(pos), self.stone_radius(), color);
    }

    fn stone_radius(&self) -> f32 {
        self.cell_size * STONE_RADIUS_RATIO
    }

    /// Nearest point to `screen_pos`, if close enough to count as a hit
    pub fn screen_to_board(&self, screen_pos: Pos2) -> Option<Pos> {
        let max_distance = self.cell_size * HIT_RADIUS_RATIO;

        Pos::all()
            .map(|pos| (pos, self.board_to_screen(pos).distance(screen_pos)))
            .filter(|&(_, distance)| distance <= max_distance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(pos, _)| pos)
    }

    /// Screen coordinates of a point
    pub fn board_to_screen(&self, pos: Pos) -> Pos2 {
        let (col, row) = POINT_COORDS[pos.to_index()];
        let x = self.board_rect.min.x + BOARD_MARGIN + col as f32 * self.cell_size;
        let y = self.board_rect.min.y + BOARD_MARGIN + row as f32 * self.cell_size;
        Pos2::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> BoardView {
        BoardView {
            cell_size: 50.0,
            board_rect: Rect::from_min_size(Pos2::ZERO, Vec2::splat(380.0)),
        }
    }

    #[test]
    fn test_board_to_screen_corners() {
        let view = view();
        assert_eq!(view.board_to_screen(Pos::new(0)), Pos2::new(40.0, 40.0));
        assert_eq!(view.board_to_screen(Pos::new(23)), Pos2::new(340.0, 340.0));
        assert_eq!(view.board_to_screen(Pos::new(16)), Pos2::new(190.0, 240.0));
    }

    #[test]
    fn test_screen_to_board_roundtrip() {
        let view = view();
        for pos in Pos::all() {
            let screen = view.board_to_screen(pos) + Vec2::new(8.0, -8.0);
            assert_eq!(view.screen_to_board(screen), Some(pos));
        }
    }

    #[test]
    fn test_screen_to_board_misses() {
        let view = view();
        // Center of the board holds no point
        assert_eq!(view.screen_to_board(Pos2::new(190.0, 190.0)), None);
        assert_eq!(view.screen_to_board(Pos2::new(-100.0, 40.0)), None);
    }

    #[test]
    fn test_neighbors_are_on_a_grid_line() {
        for from in Pos::all() {
            for &to in neighbors(from) {
                let (c1, r1) = POINT_COORDS[from.to_index()];
                let (c2, r2) = POINT_COORDS[to.to_index()];
                assert!(c1 == c2 || r1 == r2, "{:?} and {:?} are not aligned", from, to);
            }
        }
    }
}
