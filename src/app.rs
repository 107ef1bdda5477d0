use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::assets::Assets;
use crate::config::{Options, OPTIONS_FILE, OPTION_SPECS};
use crate::game::{Input, TickOutcome, World, FIXED_DT};
use crate::scores::{HighScore, HIGH_SCORE_FILE};

/// Without release events a key counts as held while its last press or repeat
/// is at most this many frames old; ~130 ms @ 60 FPS.
const HOLD_WINDOW: u64 = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    Playing,
    Paused,
    OptionsMenu,
    GameOver,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Control {
    Left,
    Right,
    Fire,
}

impl Control {
    fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Control::Left),
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Control::Right),
            KeyCode::Char(' ') | KeyCode::Up => Some(Control::Fire),
            _ => None,
        }
    }

    fn slot(self) -> usize {
        match self {
            Control::Left => 0,
            Control::Right => 1,
            Control::Fire => 2,
        }
    }
}

/// Working copy edited by the options screen; committed on save.
pub struct OptionsMenu {
    pub selected: usize,
    pub draft: Options,
}

pub struct App {
    pub state: GameState,
    pub world: World,
    pub options: Options,
    pub high_score: HighScore,
    pub menu: OptionsMenu,
    pub assets: Assets,
    data_dir: PathBuf,
    seed: u64,
    restarts: u64,
    frame: u64,
    held: [Option<u64>; 3],
    key_releases: bool,
}

impl App {
    pub fn new(data_dir: &Path, assets: Assets, seed: u64) -> Self {
        let options = Options::load(&data_dir.join(OPTIONS_FILE));
        let high_score = HighScore::load(&data_dir.join(HIGH_SCORE_FILE));
        let world = World::new(&options, assets.sizes(), seed);
        tracing::info!(seed, high_score = high_score.best(), "session started");
        Self {
            state: GameState::Playing,
            world,
            menu: OptionsMenu {
                selected: 0,
                draft: options.clone(),
            },
            options,
            high_score,
            assets,
            data_dir: data_dir.to_path_buf(),
            seed,
            restarts: 0,
            frame: 0,
            held: [None; 3],
            key_releases: false,
        }
    }

    /// Set when the terminal reports key releases. Held keys then stay down
    /// until released instead of timing out.
    pub fn set_key_releases(&mut self, enabled: bool) {
        self.key_releases = enabled;
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn should_quit(&self) -> bool {
        self.state == GameState::Quit
    }

    /// High score as shown on screen, including the running session.
    pub fn displayed_high_score(&self) -> u32 {
        self.high_score.best().max(self.world.score())
    }

    pub fn on_tick(&mut self) {
        self.frame += 1;
        if self.state != GameState::Playing {
            return;
        }
        let input = self.held_input();
        if let TickOutcome::GameOver(_) = self.world.advance(FIXED_DT, input) {
            self.enter_game_over();
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        match key.kind {
            KeyEventKind::Press => {}
            KeyEventKind::Repeat => {
                // Repeats only keep movement and fire alive.
                if self.state == GameState::Playing {
                    if let Some(control) = Control::from_key(key.code) {
                        self.held[control.slot()] = Some(self.frame);
                    }
                }
                return;
            }
            KeyEventKind::Release => {
                if let Some(control) = Control::from_key(key.code) {
                    self.held[control.slot()] = None;
                }
                return;
            }
        }

        // Ctrl+C always quits
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return;
        }
        if matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q')) {
            self.quit();
            return;
        }

        match self.state {
            GameState::Playing => match key.code {
                KeyCode::Char('p') | KeyCode::Char('P') => self.state = GameState::Paused,
                KeyCode::Char('o') | KeyCode::Char('O') => self.open_options(),
                code => {
                    if let Some(control) = Control::from_key(code) {
                        self.held[control.slot()] = Some(self.frame);
                    }
                }
            },
            GameState::Paused => match key.code {
                KeyCode::Char('p') | KeyCode::Char('P') => self.state = GameState::Playing,
                KeyCode::Char('o') | KeyCode::Char('O') => self.open_options(),
                _ => {}
            },
            GameState::OptionsMenu => self.handle_menu_key(key.code),
            GameState::GameOver => {
                if matches!(key.code, KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Enter) {
                    self.restart();
                }
            }
            GameState::Quit => {}
        }
    }

    fn handle_menu_key(&mut self, code: KeyCode) {
        let count = OPTION_SPECS.len();
        match code {
            KeyCode::Esc => self.save_options(),
            KeyCode::Up => self.menu.selected = (self.menu.selected + count - 1) % count,
            KeyCode::Down => self.menu.selected = (self.menu.selected + 1) % count,
            KeyCode::Left | KeyCode::Right => {
                let key = OPTION_SPECS[self.menu.selected].key;
                if let Err(e) = self.menu.draft.adjust(key, code == KeyCode::Right) {
                    tracing::warn!("options menu: {e}");
                }
            }
            _ => {}
        }
    }

    fn held_input(&self) -> Input {
        let held = |control: Control| {
            self.held[control.slot()]
                .map(|seen| {
                    self.key_releases || self.frame.saturating_sub(seen) <= HOLD_WINDOW
                })
                .unwrap_or(false)
        };
        Input {
            left: held(Control::Left),
            right: held(Control::Right),
            fire: held(Control::Fire),
        }
    }

    fn open_options(&mut self) {
        self.menu.draft = self.options.clone();
        self.held = [None; 3];
        self.state = GameState::OptionsMenu;
    }

    fn save_options(&mut self) {
        self.options = self.menu.draft.clone();
        let path = self.data_dir.join(OPTIONS_FILE);
        match self.options.save(&path) {
            Ok(()) => tracing::info!("options saved to {}", path.display()),
            Err(e) => tracing::warn!("failed to save options to {}: {e}", path.display()),
        }
        self.world.apply_options(&self.options);
        self.state = GameState::Playing;
    }

    fn enter_game_over(&mut self) {
        self.state = GameState::GameOver;
        self.held = [None; 3];
        self.persist_high_score();
    }

    fn restart(&mut self) {
        self.options = Options::load(&self.data_dir.join(OPTIONS_FILE));
        self.restarts += 1;
        let seed = self.seed.wrapping_add(self.restarts);
        self.world = World::new(&self.options, self.assets.sizes(), seed);
        self.held = [None; 3];
        self.state = GameState::Playing;
        tracing::info!(seed, "game restarted");
    }

    fn quit(&mut self) {
        if self.state == GameState::Quit {
            return;
        }
        self.persist_high_score();
        self.state = GameState::Quit;
    }

    fn persist_high_score(&mut self) {
        if let Err(e) = self.high_score.record(self.world.score()) {
            tracing::warn!("failed to save high score: {e}");
        }
    }
}
