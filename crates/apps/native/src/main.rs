mod console;
mod output;
#[cfg(feature = "audio")]
mod speaker;

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use app::{App, AppConfig};
use clap::Parser;
use director::{Director, Wanderer};
use layers::synthetic::SyntheticMap;
use layers::{MapStyle, MapView, TerrainSample};
use panel::{MemoryDom, ids};
use runtime::{Frame, FrameLoop};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::console::{Command, HELP};
use crate::output::Output;

type NativeApp = App<SyntheticMap, Output, MemoryDom>;

/// Drift over a procedural landscape and listen to it.
#[derive(Parser, Debug)]
#[command(name = "driftscape", version)]
struct Cli {
    /// JSON session config; missing keys keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    fps: Option<f64>,

    /// Stop after this many frames (0 runs until `quit`).
    #[arg(long, default_value_t = 0)]
    frames: u64,

    /// Seeds both the procedural world and the autopilot.
    #[arg(long)]
    seed: Option<u64>,

    /// outdoors, satellite, dark, or a style URL.
    #[arg(long)]
    style: Option<String>,

    /// Cruising speed, 0 to 10.
    #[arg(long)]
    speed: Option<f64>,

    #[arg(long)]
    no_audio: bool,

    /// Do not read commands from stdin.
    #[arg(long)]
    no_console: bool,
}

impl Cli {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(fps) = self.fps {
            config.frame.fps = fps;
        }
        if let Some(seed) = self.seed {
            config.map.world_seed = seed;
            config.wanderer.seed = seed;
        }
        if let Some(style) = &self.style {
            config.map.style = MapStyle::new(console::style_url(style));
        }
        if let Some(speed) = self.speed {
            config.wanderer.speed = speed;
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path).map_err(|e| e.to_string())?,
        None => AppConfig::default(),
    };
    cli.apply(&mut config);

    let map = SyntheticMap::new(
        config.map.viewport(),
        config.map.style.clone(),
        config.map.world_seed,
    );
    let output = Output::select(cli.no_audio);
    info!(output = output.name(), style = %config.map.style, "starting");
    let director = Director::new(output, &config.audio, Wanderer::new(&config.wanderer));

    let dom = MemoryDom::with_panel();
    let knob_center = dom
        .element(ids::HEADING_KNOB)
        .map(|el| el.rect.center())
        .unwrap_or_default();

    let mut app: NativeApp = App::new(map, director, dom);
    let mut frames = FrameLoop::new(config.frame.fps);
    if cli.frames > 0 {
        frames = frames.with_limit(cli.frames);
    }

    app.init(&mut frames).map_err(|e| format!("map init: {e}"))?;

    // A terminal has no autoplay policy to wait out.
    if let Err(err) = app.director().borrow_mut().resume_audio() {
        warn!("audio resume failed: {err}");
    }

    let commands = if cli.no_console {
        None
    } else {
        println!("{HELP}");
        Some(console::spawn_stdin(knob_center))
    };

    run(&mut app, &mut frames, commands);
    Ok(())
}

fn run(
    app: &mut NativeApp,
    frames: &mut FrameLoop,
    commands: Option<crossbeam_channel::Receiver<Command>>,
) {
    let frame_dt = Duration::from_secs_f64(frames.dt_s());
    let status_every = (1.0 / frames.dt_s()).round().max(1.0) as u64;
    let mut deadline = Instant::now();
    let mut last: Option<Frame> = None;

    'run: loop {
        if let Some(rx) = &commands {
            for cmd in rx.try_iter() {
                match cmd {
                    Command::Inputs(inputs) => {
                        for input in &inputs {
                            app.handle_input(input);
                        }
                    }
                    Command::Status => log_status(app, last, app.last_sample()),
                    Command::Quit => {
                        info!("quit");
                        app.stop_loop(frames);
                        break 'run;
                    }
                }
            }
        }

        let Some(frame) = frames.poll() else {
            break;
        };
        let sample = app.frame(frame, frames);
        if frame.index % status_every == 0 {
            log_status(app, Some(frame), sample);
        }
        last = Some(frame);

        deadline += frame_dt;
        let now = Instant::now();
        if deadline > now {
            thread::sleep(deadline - now);
        } else {
            deadline = now;
        }
    }

    let ran = last.map(|f| f.index + 1).unwrap_or(0);
    info!(frames = ran, "stopped");
}

fn log_status(app: &NativeApp, frame: Option<Frame>, sample: TerrainSample) {
    let map = app.map();
    let map = map.borrow();
    let director = app.director();
    let director = director.borrow();
    let center = map.center();
    info!(
        frame = frame.map(|f| f.index).unwrap_or(0),
        t = frame.map(|f| f.time.seconds()).unwrap_or(0.0),
        lng = center.lng,
        lat = center.lat,
        terrain = %sample.kind,
        elevation_m = sample.elevation,
        water = director.water_level(),
        bearing = director.wanderer.bearing_deg(),
        mode = ?director.wanderer.mode(),
        playing = director.is_playing(),
        zen = app.panel().is_zen(),
        "status"
    );
}
