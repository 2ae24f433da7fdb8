extern crate podracer;

use anyhow::{Context, Result};
use clap::Parser;
use podracer::{
    config::RaceConfig,
    error::MatchError,
    logging::init_tracing,
    referee::{Match, Race},
    simulation::predict_race_path,
    vec2::Vec2,
    world::Track,
};

use flo_canvas::*;
use flo_draw::*;

use futures::executor;
use futures::prelude::*;

use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{error, info};

/// Map units per canvas unit.
const SCALE: f64 = 0.1;

#[derive(Parser, Debug)]
#[command(about = "Race two copies of the bot against each other")]
struct Args {
    /// Track seed; random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = 3)]
    laps: u32,

    /// Play this many turns without a window and report the result.
    #[arg(long, value_name = "TURNS")]
    headless: Option<u32>,
}

fn new_match(seed: u64, laps: u32, cfg: &RaceConfig) -> Result<Match, MatchError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let track = Track::random(&mut rng, laps, &cfg.physics);
    info!(seed, checkpoints = track.len(), laps, "new track");
    Match::new(track, [cfg.clone(), cfg.clone()])
}

fn to_canvas(pos: Vec2, height: f64) -> (f32, f32) {
    ((pos.x * SCALE) as f32, (height - pos.y * SCALE) as f32)
}

fn draw_circle_at_pos(gc: &mut CanvasGraphicsContext, pos: Vec2, radius: f64, height: f64, col: Color, width: f32) {
    let (x, y) = to_canvas(pos, height);
    gc.new_path();
    gc.circle(x, y, (radius * SCALE) as f32);

    gc.fill_color(col);
    gc.fill();
    gc.line_width(width);
    gc.stroke_color(Color::Rgba(0.0, 0.0, 0.0, 1.0));
    gc.stroke();
}

fn draw_track(gc: &mut CanvasGraphicsContext, track: &Track, height: f64) {
    gc.new_path();
    for (i, cp) in track.checkpoints().iter().chain(track.checkpoints().first()).enumerate() {
        let (x, y) = to_canvas(cp.pos, height);
        if i == 0 {
            gc.move_to(x, y);
        } else {
            gc.line_to(x, y);
        }
    }
    gc.line_width(1.0);
    gc.stroke_color(Color::Rgba(0.0, 0.0, 0.0, 0.2));
    gc.stroke();

    for cp in track.checkpoints() {
        let alpha = if cp.index == 0 { 0.6 } else { 0.3 };
        draw_circle_at_pos(gc, cp.pos, track.radius, height, Color::Rgba(1., 0.8, 0., alpha), 1.0);
    }
}

fn player_color(player: usize, alpha: f32) -> Color {
    if player == 0 {
        Color::Rgba(0., 0.3, 1., alpha)
    } else {
        Color::Rgba(1., 0.1, 0.1, alpha)
    }
}

fn draw_pods(gc: &mut CanvasGraphicsContext, race: &Race, radius: f64, height: f64) {
    for pod in race.pods() {
        let width = if pod.shielded || pod.shield > 0 { 4.0 } else { 1.0 };
        draw_circle_at_pos(gc, pod.pos, radius, height, player_color(pod.player, 1.), width);

        // heading
        let (x, y) = to_canvas(pod.pos, height);
        let (hx, hy) = to_canvas(pod.pos + Vec2::from_angle(pod.angle) * radius * 1.5, height);
        gc.new_path();
        gc.move_to(x, y);
        gc.line_to(hx, hy);
        gc.line_width(2.0);
        gc.stroke_color(Color::Rgba(0.0, 0.0, 0.0, 1.0));
        gc.stroke();
    }
}

fn draw_predictions(gc: &mut CanvasGraphicsContext, game: &Match, height: f64) {
    for (player, side) in game.sides().iter().enumerate() {
        let cfg = side.strategy.config();
        for pod in &side.world.mine {
            let path = predict_race_path(pod, &side.world.track, cfg.intercept.horizon(), cfg);

            gc.new_path();
            let (x, y) = to_canvas(pod.pos, height);
            gc.move_to(x, y);
            for state in &path {
                let (x, y) = to_canvas(state.pos, height);
                gc.line_to(x, y);
            }
            gc.line_width(1.0);
            gc.stroke_color(player_color(player, 0.5));
            gc.stroke();
        }
    }
}

struct App {
    game: Match,
    canvas: Canvas,
    cfg: RaceConfig,
    seed: u64,
    laps: u32,

    draw_predictions: bool,
}

impl App {
    fn new(canvas: Canvas, seed: u64, laps: u32, cfg: RaceConfig) -> Result<Self, MatchError> {
        let game = new_match(seed, laps, &cfg)?;

        Ok(App {
            game,
            canvas,
            cfg,
            seed,
            laps,
            draw_predictions: true,
        })
    }

    fn redraw(&mut self) {
        let physics = self.cfg.physics;
        let height = physics.map_height * SCALE;
        let game = &self.game;
        let show_predictions = self.draw_predictions;

        self.canvas.draw(|gc| {
            gc.clear_all_layers();
            gc.canvas_height(height as f32);
            gc.center_region(0.0, 0.0, (physics.map_width * SCALE) as f32, height as f32);

            draw_track(gc, game.race().track(), height);
            if show_predictions {
                draw_predictions(gc, game, height);
            }
            draw_pods(gc, game.race(), physics.pod_radius, height);
        });
    }

    fn step(&mut self) -> Result<(), MatchError> {
        if !self.game.turn()? {
            info!(
                turn = self.game.race().turn(),
                winner = ?self.game.race().winner(),
                "race over"
            );
        }
        self.redraw();
        Ok(())
    }

    fn regenerate(&mut self) -> Result<(), MatchError> {
        self.seed = self.seed.wrapping_add(1);
        self.game = new_match(self.seed, self.laps, &self.cfg)?;
        self.redraw();
        Ok(())
    }
}

fn run_headless(seed: u64, laps: u32, turns: u32, cfg: &RaceConfig) -> Result<()> {
    let mut game = new_match(seed, laps, cfg)?;
    let winner = game.play_out(turns).context("running headless race")?;

    let race = game.race();
    for pod in race.pods() {
        info!(player = pod.player, passed = pod.passed, boost_used = pod.boost_used, "pod result");
    }
    match winner {
        Some(player) => info!(player, turns = race.turn(), "winner"),
        None => info!(turns = race.turn(), "no winner"),
    }
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    let cfg = RaceConfig::load().context("loading race config")?;
    let seed = args.seed.unwrap_or_else(|| rand::thread_rng().gen());
    let laps = args.laps;

    if let Some(turns) = args.headless {
        return run_headless(seed, laps, turns, &cfg);
    }

    with_2d_graphics(move || {
        executor::block_on(async move {
            let (canvas, mut events) = create_canvas_window_with_events("Pod racing");

            let mut app = match App::new(canvas, seed, laps, cfg) {
                Ok(app) => app,
                Err(err) => {
                    error!(%err, "cannot start race");
                    return;
                }
            };

            app.redraw();

            while let Some(event) = events.next().await {
                let result = match event {
                    DrawEvent::KeyDown(_, Some(Key::KeySpace)) => app.step(),
                    DrawEvent::KeyDown(_, Some(Key::KeyR)) => app.regenerate(),
                    DrawEvent::KeyDown(_, Some(Key::KeyT)) => {
                        app.draw_predictions = !app.draw_predictions;
                        app.redraw();
                        Ok(())
                    }
                    DrawEvent::KeyDown(_, Some(Key::KeyEscape)) => {
                        std::process::exit(0);
                    }
                    _ => Ok(()),
                };

                if let Err(err) = result {
                    error!(%err, "race aborted");
                    std::process::exit(1);
                }
            }
        });
    });

    Ok(())
}
