//! Main application for the Nine Men's Morris GUI

use eframe::egui;
use egui::{CentralPanel, Color32, Context, CornerRadius, Frame, RichText, SidePanel, TopBottomPanel, Vec2};

use super::board_view::BoardView;
use super::game_state::{GameMode, GameResult, GameState, Selection, WinReason};
use super::theme::*;
use crate::board::{Phase, PIECES_PER_PLAYER};
use crate::{Difficulty, Stone};

/// Main Nine Men's Morris application
pub struct MorrisApp {
    state: GameState,
    board_view: BoardView,
    show_debug: bool,
}

impl Default for MorrisApp {
    fn default() -> Self {
        Self::with_state(GameState::new(GameMode::default(), Difficulty::default()))
    }
}

impl MorrisApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, mode: GameMode, difficulty: Difficulty) -> Self {
        Self::with_state(GameState::new(mode, difficulty))
    }

    fn with_state(state: GameState) -> Self {
        Self {
            state,
            board_view: BoardView::default(),
            show_debug: true,
        }
    }

    fn new_game(&mut self, mode: GameMode) {
        self.state.mode = mode;
        self.state.reset();
    }

    fn render_menu_bar(&mut self, ctx: &Context) {
        TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("Game", |ui| {
                    if ui.button("New Game (vs Computer)").clicked() {
                        self.new_game(GameMode::PvCpu);
                        ui.close_menu();
                    }
                    if ui.button("New Game (PvP)").clicked() {
                        self.new_game(GameMode::PvP);
                        ui.close_menu();
                    }
                });

                ui.menu_button("Difficulty", |ui| {
                    for difficulty in Difficulty::ALL {
                        let selected = self.state.difficulty == difficulty;
                        if ui.radio(selected, difficulty.label()).clicked() {
                            // Applies from the computer's next turn
                            self.state.difficulty = difficulty;
                            ui.close_menu();
                        }
                    }
                });

                ui.menu_button("View", |ui| {
                    ui.checkbox(&mut self.show_debug, "Debug Panel (D)");
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let mode_text = match self.state.mode {
                        GameMode::PvCpu => format!("vs Computer ({})", self.state.difficulty.label()),
                        GameMode::PvP => "PvP - Hotseat".to_string(),
                    };
                    ui.label(mode_text);
                });
            });
        });
    }

    fn render_side_panel(&mut self, ctx: &Context) {
        SidePanel::right("info_panel")
            .min_width(240.0)
            .max_width(280.0)
            .frame(Frame::new().fill(Color32::from_rgb(25, 27, 31)))
            .show(ctx, |ui| {
                ui.add_space(12.0);
                self.render_title_card(ui);
                ui.add_space(12.0);

                self.render_turn_card(ui);
                ui.add_space(10.0);

                self.render_timer_card(ui);
                ui.add_space(10.0);

                self.render_pieces_card(ui);

                if self.show_debug {
                    ui.add_space(10.0);
                    self.render_debug_card(ui);
                }

                if let Some(result) = self.state.game_over {
                    ui.add_space(10.0);
                    self.render_game_over_card(ui, result);
                }

                if let Some(msg) = &self.state.message {
                    ui.add_space(10.0);
                    Self::render_message_card(ui, msg);
                }
            });
    }

    fn card_frame() -> Frame {
        Frame::new()
            .fill(Color32::from_rgb(35, 38, 43))
            .corner_radius(CornerRadius::same(8))
            .inner_margin(12.0)
    }

    fn color_name(stone: Stone) -> &'static str {
        match stone {
            Stone::White => "WHITE",
            Stone::Black => "BLACK",
            Stone::Empty => "-",
        }
    }

    fn render_title_card(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.add_space(8.0);
            ui.label(RichText::new("NINE MEN'S MORRIS").size(20.0).strong().color(TEXT_PRIMARY));
        });
    }

    fn render_turn_card(&self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            let turn = self.state.current_turn();
            let (fill, rim) = match turn {
                Stone::Black => (BLACK_STONE, BLACK_STONE_HIGHLIGHT),
                _ => (WHITE_STONE, WHITE_STONE_SHADOW),
            };

            ui.horizontal(|ui| {
                let (rect, _) = ui.allocate_exact_size(Vec2::new(48.0, 48.0), egui::Sense::hover());
                ui.painter().circle_filled(rect.center(), 22.0, fill);
                ui.painter().circle_stroke(rect.center(), 22.0, egui::Stroke::new(2.0, rim));

                ui.add_space(12.0);

                ui.vertical(|ui| {
                    ui.add_space(4.0);
                    ui.label(RichText::new(Self::color_name(turn)).size(18.0).strong().color(TEXT_PRIMARY));

                    let status = if self.state.game_over.is_some() {
                        ("Game Over", WIN_HIGHLIGHT)
                    } else if self.state.is_cpu_thinking() {
                        ("Computer thinking...", TIMER_WARNING)
                    } else if matches!(self.state.selection, Selection::AwaitingCapture(_)) {
                        ("Remove a piece", TIMER_CRITICAL)
                    } else {
                        match self.state.board().phase(turn) {
                            Phase::Placing => ("Place a piece", TIMER_NORMAL),
                            Phase::Moving => ("Move a piece", TIMER_NORMAL),
                            Phase::Flying => ("Fly a piece", TIMER_NORMAL),
                        }
                    };
                    ui.label(RichText::new(status.0).size(12.0).color(status.1));
                });
            });
        });
    }

    fn render_timer_card(&self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("TIMER").size(10.0).color(TEXT_MUTED));
            ui.add_space(6.0);

            if let Some(elapsed) = self.state.cpu_thinking_elapsed() {
                let secs = elapsed.as_secs_f32();
                let limit = self.state.difficulty.time_limit().as_secs_f32();
                let color = if secs < limit * 0.5 {
                    TIMER_NORMAL
                } else if secs < limit * 0.8 {
                    TIMER_WARNING
                } else {
                    TIMER_CRITICAL
                };
                ui.label(RichText::new(format!("{:.2}s", secs)).size(28.0).strong().color(color));
            } else if let Some(clock) = &self.state.clock {
                let secs = clock.remaining().as_secs_f32();
                let color = if secs > 10.0 {
                    TIMER_NORMAL
                } else if secs > 5.0 {
                    TIMER_WARNING
                } else {
                    TIMER_CRITICAL
                };
                ui.label(RichText::new(format!("{:.1}s left", secs)).size(24.0).color(color));
            } else {
                ui.label(RichText::new("--").size(24.0).color(TEXT_SECONDARY));
            }

            if let Some(result) = &self.state.last_ai_result {
                ui.add_space(4.0);
                ui.label(
                    RichText::new(format!("Last computer move: {:.3}s", result.time_ms as f32 / 1000.0))
                        .size(10.0)
                        .color(TEXT_SECONDARY),
                );
            }
        });
    }

    fn render_pieces_card(&self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("PIECES").size(10.0).color(TEXT_MUTED));
            ui.add_space(8.0);

            for stone in [Stone::White, Stone::Black] {
                self.render_pieces_row(ui, stone);
                ui.add_space(6.0);
            }

            ui.label(
                RichText::new(format!("Move #{}", self.state.move_history.len()))
                    .size(11.0)
                    .color(TEXT_SECONDARY),
            );
        });
    }

    /// One dot per piece: bright on the board, dim in hand, hollow when lost
    fn render_pieces_row(&self, ui: &mut egui::Ui, stone: Stone) {
        let board = self.state.board();
        let on_board = board.on_board(stone);
        let in_hand = board.in_hand(stone);
        let (on_color, hand_color) = match stone {
            Stone::Black => (Color32::from_rgb(90, 90, 95), Color32::from_rgb(55, 55, 60)),
            _ => (Color32::from_rgb(220, 220, 225), Color32::from_rgb(120, 120, 125)),
        };

        ui.horizontal(|ui| {
            ui.label(RichText::new(Self::color_name(stone)).size(11.0).color(TEXT_SECONDARY));
            for i in 0..PIECES_PER_PLAYER {
                let (symbol, color) = if i < on_board {
                    ("●", on_color)
                } else if i < on_board + in_hand {
                    ("●", hand_color)
                } else {
                    ("○", TEXT_MUTED)
                };
                ui.label(RichText::new(symbol).size(14.0).color(color));
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let color = if on_board + in_hand <= 3 { TIMER_WARNING } else { TEXT_SECONDARY };
                ui.label(RichText::new(format!("{}+{}", on_board, in_hand)).size(12.0).color(color));
            });
        });
    }

    fn render_debug_card(&self, ui: &mut egui::Ui) {
        Frame::new()
            .fill(Color32::from_rgb(30, 33, 38))
            .corner_radius(CornerRadius::same(8))
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.label(RichText::new("AI DEBUG").size(10.0).color(TEXT_MUTED));
                ui.add_space(6.0);

                let Some(result) = &self.state.last_ai_result else {
                    ui.label(RichText::new("Waiting for AI...").size(10.0).color(TEXT_MUTED));
                    return;
                };

                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.label(
                            RichText::new(format!("{:?}", result.search_type))
                                .size(11.0)
                                .strong()
                                .color(TIMER_NORMAL),
                        );
                        ui.label(RichText::new(format!("Score: {}", result.score)).size(10.0).color(TEXT_SECONDARY));
                        ui.label(RichText::new(format!("Depth: {}", result.depth)).size(10.0).color(TEXT_SECONDARY));
                        if result.stats.beta_cutoffs > 0 {
                            ui.label(
                                RichText::new(format!(
                                    "Cutoffs: {} ({:.0}% first)",
                                    result.stats.beta_cutoffs,
                                    result.stats.first_move_rate()
                                ))
                                .size(10.0)
                                .color(TEXT_MUTED),
                            );
                        }
                    });
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::TOP), |ui| {
                        ui.vertical(|ui| {
                            ui.label(RichText::new(format!("{}ms", result.time_ms)).size(10.0).color(TEXT_SECONDARY));
                            ui.label(RichText::new(format!("{} nodes", result.nodes)).size(10.0).color(TEXT_MUTED));
                        });
                    });
                });

                if let Some(mv) = result.best_move {
                    ui.add_space(4.0);
                    ui.label(RichText::new(format!("-> {}", mv)).size(12.0).strong().color(WIN_HIGHLIGHT));
                }
            });
    }

    fn render_game_over_card(&mut self, ui: &mut egui::Ui, result: GameResult) {
        let reason = match result.reason {
            WinReason::Material => "reducing to two pieces",
            WinReason::Blocked => "blocking every move",
            WinReason::Timeout => "timeout",
        };

        Frame::new()
            .fill(Color32::from_rgb(45, 80, 55))
            .corner_radius(CornerRadius::same(8))
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new("GAME OVER").size(12.0).color(Color32::from_rgb(180, 255, 180)));
                    ui.add_space(8.0);
                    ui.label(
                        RichText::new(format!("{} WINS!", Self::color_name(result.winner)))
                            .size(18.0)
                            .strong()
                            .color(TEXT_PRIMARY),
                    );
                    ui.add_space(4.0);
                    ui.label(RichText::new(format!("by {}", reason)).size(11.0).color(TEXT_SECONDARY));
                    ui.add_space(12.0);

                    Frame::new()
                        .fill(Color32::from_rgb(60, 100, 70))
                        .corner_radius(CornerRadius::same(6))
                        .inner_margin(10.0)
                        .show(ui, |ui| {
                            let label = egui::Label::new(
                                RichText::new("New Game").size(14.0).strong().color(TEXT_PRIMARY),
                            )
                            .sense(egui::Sense::click());
                            if ui.add(label).clicked() {
                                self.state.reset();
                            }
                        });
                });
            });
    }

    fn render_message_card(ui: &mut egui::Ui, msg: &str) {
        Frame::new()
            .fill(Color32::from_rgb(80, 60, 30))
            .corner_radius(CornerRadius::same(8))
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.label(RichText::new(msg).size(11.0).color(TEXT_PRIMARY));
            });
    }

    fn render_board(&mut self, ctx: &Context) {
        CentralPanel::default().show(ctx, |ui| {
            ui.style_mut().visuals.panel_fill = Color32::from_rgb(40, 42, 46);

            if let Some(pos) = self.board_view.show(ui, &self.state) {
                self.state.handle_click(pos);
            }
        });
    }

    /// Keyboard shortcuts
    fn handle_input(&mut self, ctx: &Context) {
        ctx.input(|i| {
            if i.key_pressed(egui::Key::D) {
                self.show_debug = !self.show_debug;
            }

            // Nothing is committed until the selection completes
            if i.key_pressed(egui::Key::Escape) {
                self.state.cancel_selection();
            }

            if i.key_pressed(egui::Key::N) {
                self.state.reset();
            }
        });
    }
}

impl eframe::App for MorrisApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.handle_input(ctx);
        self.state.update();

        self.render_menu_bar(ctx);
        self.render_side_panel(ctx);
        self.render_board(ctx);

        // Keep the clocks ticking
        if self.state.game_over.is_none() && (self.state.is_cpu_thinking() || self.state.clock.is_some()) {
            ctx.request_repaint();
        }
    }
}
