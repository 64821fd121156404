//! Render thread: owns the LED matrix and paints the selected screen.
//!
//! The `rpi-led-matrix` C library is not thread-safe, so all matrix
//! operations happen on this one dedicated thread. It shares two things
//! with the refresh side: the data store (read under its mutex, briefly,
//! once per frame) and the `scrolling_finished` flag, which this thread
//! sets once a banner's marquee has made a full pass so the refresh loop
//! knows the current game may rotate away.
//!
//! The thread exits when the shutdown flag clears; the refresh loop
//! treats that as the signal to wind the whole process down.

use crate::config::ScoreboardConfig;
use crate::data::DataState;
use crate::data::game::{Game, GameStatus};
use crate::data::offday::Weather;
use crate::data::standings::Division;
use crate::screen::{ScreenType, select_screen};
use crate::{Color, Error, create_matrix, is_running, team_colors};
use image::imageops::FilterType;
use image::{ImageReader, RgbImage};
use rpi_led_matrix::{LedCanvas, LedFont, LedMatrix};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

const FRAME_DELAY: Duration = Duration::from_millis(50);
const DIVISION_DWELL: Duration = Duration::from_secs(5);
const STATIC_PASS: Duration = Duration::from_secs(2);

/// Advance width of the 4x6 BDF font we draw everything with.
const CHAR_W: i32 = 4;
const ICON_SIZE: u32 = 12;

pub struct MainRenderer {
    matrix: LedMatrix,
    config: ScoreboardConfig,
    state: Arc<Mutex<DataState>>,
    scrolling_finished: Arc<AtomicBool>,
    running: Arc<AtomicBool>,
    font: LedFont,
    assets_dir: PathBuf,
    icons: HashMap<String, RgbImage>,
    last_marquee: String,
    division_index: usize,
}

impl MainRenderer {
    /// Build the renderer, including the matrix itself. `LedMatrix` wraps
    /// raw C handles and cannot cross threads, so this must run on the
    /// thread that will do the drawing.
    pub fn new(
        config: ScoreboardConfig,
        state: Arc<Mutex<DataState>>,
        scrolling_finished: Arc<AtomicBool>,
        running: Arc<AtomicBool>,
        fonts_dir: &Path,
        assets_dir: &Path,
    ) -> Result<Self, Error> {
        let matrix = create_matrix(config.panel)?;

        let font_path = fonts_dir.join("4x6.bdf");
        let font = LedFont::new(&font_path).map_err(|e| Error::Font {
            path: font_path,
            msg: e.to_string(),
        })?;

        Ok(Self {
            matrix,
            config,
            state,
            scrolling_finished,
            running,
            font,
            assets_dir: assets_dir.to_path_buf(),
            icons: HashMap::new(),
            last_marquee: String::new(),
            division_index: 0,
        })
    }

    /// Paint until shutdown. Re-selects the screen between passes so a
    /// schedule change (games appearing on what looked like an off-day)
    /// shows up without a restart.
    pub fn run(mut self) {
        tracing::info!("render thread started");
        while is_running(&self.running) {
            let screen = {
                let state = self.state.lock().unwrap();
                select_screen(&self.config, &state)
            };
            match screen {
                ScreenType::Games => self.games_pass(),
                ScreenType::Standings => self.standings_pass(),
                ScreenType::News => self.news_pass(),
            }
        }
        tracing::info!("render thread shutting down");
    }

    fn rows(&self) -> i32 {
        self.config.panel.rows as i32
    }

    fn cols(&self) -> i32 {
        self.config.panel.cols as i32
    }

    // ── Games screen ───────────────────────────────────────────────

    /// One marquee cycle for the current game. The banner itself is
    /// redrawn from fresh state every frame so live scores tick up
    /// mid-scroll; the marquee text is fixed for the pass.
    fn games_pass(&mut self) {
        let game = {
            let state = self.state.lock().unwrap();
            state.schedule.current_game().cloned()
        };

        let Some(game) = game else {
            self.static_pass(|r, canvas| {
                r.draw_text_centered(canvas, "NO GAMES", r.rows() / 2 + 2);
            });
            return;
        };

        let marquee = marquee_text(&game);
        if marquee != self.last_marquee {
            self.scrolling_finished.store(false, Ordering::SeqCst);
        }

        let text_width = marquee.len() as i32 * CHAR_W;
        let mut x = self.cols();
        let mut canvas = self.matrix.offscreen_canvas();

        while x >= -text_width && is_running(&self.running) {
            let current = {
                let state = self.state.lock().unwrap();
                state.schedule.current_game().cloned()
            };

            canvas.clear();
            if let Some(ref g) = current {
                self.draw_game_banner(&mut canvas, g);
            }
            canvas.draw_text(
                &self.font,
                &marquee,
                x,
                self.rows() - 2,
                &Color::WHITE.into(),
                0,
                false,
            );
            canvas = self.matrix.swap(canvas);

            x -= 1;
            thread::sleep(FRAME_DELAY);

            // The game rotated away mid-scroll; restart with its text.
            if current.map(|g| g.id) != Some(game.id) {
                return;
            }
        }

        self.last_marquee = marquee;
        self.scrolling_finished.store(true, Ordering::SeqCst);
    }

    fn draw_game_banner(&self, canvas: &mut LedCanvas, game: &Game) {
        let band_h = self.rows() * 10 / 32;
        let away = team_colors(&game.away.abbrev);
        let home = team_colors(&game.home.abbrev);

        fill_rect(canvas, 0, 0, self.cols(), band_h, away.bg);
        fill_rect(canvas, 0, band_h, self.cols(), band_h, home.bg);
        draw_hline(canvas, band_h - 1, self.cols(), away.accent);
        draw_hline(canvas, 2 * band_h - 1, self.cols(), home.accent);

        let away_y = band_h - 2;
        let home_y = 2 * band_h - 2;
        let away_label = self.team_label(&game.away.name, &game.away.abbrev);
        let home_label = self.team_label(&game.home.name, &game.home.abbrev);
        canvas.draw_text(&self.font, &away_label, 1, away_y, &away.text.into(), 0, false);
        canvas.draw_text(&self.font, &home_label, 1, home_y, &home.text.into(), 0, false);

        let show_line = game.status != GameStatus::Scheduled;
        if show_line {
            let away_score = self.score_line(game.away.runs, game.away.hits, game.away.errors);
            let home_score = self.score_line(game.home.runs, game.home.hits, game.home.errors);
            self.draw_text_right(canvas, &away_score, away_y, away.text);
            self.draw_text_right(canvas, &home_score, home_y, home.text);
        }

        self.draw_text_centered(canvas, &game.inning_label().to_string(), 2 * band_h + 5);
    }

    fn team_label(&self, name: &str, abbrev: &str) -> String {
        if self.config.full_team_names {
            format!("{name:13.13}")
        } else {
            format!("{abbrev:3.3}")
        }
    }

    fn score_line(&self, runs: u32, hits: u32, errors: u32) -> String {
        if self.config.show_hits_and_errors && self.config.panel.is_wide() {
            format!("{runs:>2} {hits:>2} {errors:>2}")
        } else {
            format!("{runs:>2}")
        }
    }

    // ── Standings screen ───────────────────────────────────────────

    /// One division for one dwell period, then move on. Wide panels get
    /// the record and games-back columns; narrow ones just abbrev and
    /// record. No scrolling here, so the scroll flag is left set.
    fn standings_pass(&mut self) {
        self.scrolling_finished.store(true, Ordering::SeqCst);

        let division = {
            let state = self.state.lock().unwrap();
            let preferred = state.standings.preferred(&self.config.preferred.divisions);
            if preferred.is_empty() {
                None
            } else {
                let index = self.division_index % preferred.len();
                self.division_index = (index + 1) % preferred.len();
                Some((*preferred[index]).clone())
            }
        };

        let Some(division) = division else {
            self.static_pass(|r, canvas| {
                r.draw_text_centered(canvas, "NO STANDINGS", r.rows() / 2 + 2);
            });
            return;
        };

        let deadline = Instant::now() + DIVISION_DWELL;
        let mut canvas = self.matrix.offscreen_canvas();
        while Instant::now() < deadline && is_running(&self.running) {
            canvas.clear();
            self.draw_division(&mut canvas, &division);
            canvas = self.matrix.swap(canvas);
            thread::sleep(FRAME_DELAY);
        }
    }

    fn draw_division(&self, canvas: &mut LedCanvas, division: &Division) {
        let wide = self.config.panel.is_wide();
        let divider = Color::new(30, 30, 30);
        let mut y = if wide {
            canvas.draw_text(&self.font, &division.name, 1, 5, &Color::WHITE.into(), 0, false);
            draw_hline(canvas, 6, self.cols(), divider);
            12
        } else {
            6
        };

        for team in &division.teams {
            if y > self.rows() - 1 {
                break;
            }
            let color = if team.eliminated {
                Color::new(120, 120, 120)
            } else if team.clinched {
                Color::new(255, 215, 0)
            } else {
                Color::WHITE
            };

            canvas.draw_text(&self.font, &team.abbrev, 1, y, &color.into(), 0, false);
            if wide {
                canvas.draw_text(&self.font, &team.record(), 16, y, &color.into(), 0, false);
                self.draw_text_right(canvas, &format!("{:>4}", team.games_back), y, color);
            } else {
                self.draw_text_right(canvas, &team.record(), y, color);
            }
            y += 6;
        }
    }

    // ── News / off-day screen ──────────────────────────────────────

    /// Weather up top, one full pass of the headline ticker along the
    /// bottom.
    fn news_pass(&mut self) {
        let (weather, ticker) = {
            let state = self.state.lock().unwrap();
            (state.weather.clone(), state.news.ticker_text())
        };

        if ticker != self.last_marquee {
            self.scrolling_finished.store(false, Ordering::SeqCst);
        }

        let icon = self.icon_for(&weather).cloned();
        let text_width = ticker.len() as i32 * CHAR_W;
        let mut x = self.cols();
        let mut canvas = self.matrix.offscreen_canvas();

        while x >= -text_width && is_running(&self.running) {
            canvas.clear();
            if let Some(ref icon) = icon {
                draw_image(&mut canvas, icon, 2, 2);
            }
            self.draw_text_right(&mut canvas, &weather.temperature_label(), 10, Color::WHITE);
            canvas.draw_text(
                &self.font,
                &ticker,
                x,
                self.rows() - 2,
                &Color::WHITE.into(),
                0,
                false,
            );
            canvas = self.matrix.swap(canvas);

            x -= 1;
            thread::sleep(FRAME_DELAY);
        }

        self.last_marquee = ticker;
        self.scrolling_finished.store(true, Ordering::SeqCst);
    }

    /// Icons live in `<assets>/weather/<name>.png`, loaded once and
    /// cached. A missing file just means no icon on screen.
    fn icon_for(&mut self, weather: &Weather) -> Option<&RgbImage> {
        let name = weather.icon_name().to_string();
        if !self.icons.contains_key(&name) {
            let path = self.assets_dir.join("weather").join(format!("{name}.png"));
            match load_icon(&path) {
                Ok(img) => {
                    self.icons.insert(name.clone(), img);
                }
                Err(e) => {
                    tracing::warn!("failed to load weather icon {}: {e}", path.display());
                    return None;
                }
            }
        }
        self.icons.get(&name)
    }

    // ── Shared drawing helpers ─────────────────────────────────────

    fn static_pass(&mut self, draw: impl Fn(&Self, &mut LedCanvas)) {
        self.scrolling_finished.store(true, Ordering::SeqCst);
        let deadline = Instant::now() + STATIC_PASS;
        let mut canvas = self.matrix.offscreen_canvas();
        while Instant::now() < deadline && is_running(&self.running) {
            canvas.clear();
            draw(self, &mut canvas);
            canvas = self.matrix.swap(canvas);
            thread::sleep(FRAME_DELAY);
        }
    }

    fn draw_text_centered(&self, canvas: &mut LedCanvas, text: &str, y: i32) {
        let x = (self.cols() - text.len() as i32 * CHAR_W) / 2;
        canvas.draw_text(&self.font, text, x.max(0), y, &Color::WHITE.into(), 0, false);
    }

    fn draw_text_right(&self, canvas: &mut LedCanvas, text: &str, y: i32, color: Color) {
        let x = self.cols() - text.len() as i32 * CHAR_W - 1;
        canvas.draw_text(&self.font, text, x.max(0), y, &color.into(), 0, false);
    }
}

/// What scrolls along the bottom of the games screen.
fn marquee_text(game: &Game) -> String {
    match game.status {
        GameStatus::Live => format!(
            "{} {} - {} {}",
            game.away.abbrev, game.away.runs, game.home.runs, game.home.abbrev
        ),
        GameStatus::Final => format!(
            "FINAL: {} {} - {} {}",
            game.away.abbrev, game.away.runs, game.home.runs, game.home.abbrev
        ),
        GameStatus::Scheduled => format!(
            "{} @ {} - {}",
            game.away.abbrev, game.home.abbrev, game.start_time
        ),
        GameStatus::Other => format!("{} @ {} - POSTPONED", game.away.abbrev, game.home.abbrev),
    }
}

fn fill_rect(canvas: &mut LedCanvas, x0: i32, y0: i32, w: i32, h: i32, color: Color) {
    for y in y0..y0 + h {
        canvas.draw_line(x0, y, x0 + w - 1, y, &color.into());
    }
}

fn draw_hline(canvas: &mut LedCanvas, y: i32, width: i32, color: Color) {
    canvas.draw_line(0, y, width - 1, y, &color.into());
}

fn draw_image(canvas: &mut LedCanvas, img: &RgbImage, x0: i32, y0: i32) {
    for (x, y, pixel) in img.enumerate_pixels() {
        canvas.set(x0 + x as i32, y0 + y as i32, &Color::new(pixel[0], pixel[1], pixel[2]).into());
    }
}

fn load_icon(path: &Path) -> Result<RgbImage, Box<dyn std::error::Error>> {
    let img = ImageReader::open(path)?.decode()?;
    Ok(img
        .resize_exact(ICON_SIZE, ICON_SIZE, FilterType::Lanczos3)
        .to_rgb8())
}
