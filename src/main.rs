use centrifuge_sim::state::{HeadlessOptions, RunOptions};
use centrifuge_sim::{CameraParams, SimParams};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::process;

/// Particles flung from a spinning centrifuge
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
  /// Number of particles, including the marker at the origin
  #[arg(short, long, default_value_t = 5000, value_parser = clap::value_parser!(u32).range(1..))]
  particles: u32,
  /// Multiplier applied to wall-clock time
  #[arg(short, long, default_value_t = 0.1)]
  time_scale: f32,
  /// Seed for the random number generator
  #[arg(short, long)]
  seed: Option<u64>,
  /// Run in headless mode (no window)
  #[arg(long, default_value_t = false)]
  headless: bool,
  /// Frames to simulate in headless mode
  #[arg(long, default_value_t = 600)]
  frames: u64,
  /// Headless frame on which the centrifuge releases its particles
  #[arg(long, default_value_t = 60)]
  release_frame: u64,
  /// Wall-clock seconds per headless frame
  #[arg(long, default_value_t = 1.0 / 60.0)]
  frame_time: f32,
  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
  /// Generate shell completion scripts
  Completions {
    /// The shell to generate the script for
    #[arg(value_enum)]
    shell: Shell,
  },
}

fn main() {
  let args = Args::parse();

  if let Some(Commands::Completions { shell }) = args.command {
    let mut cmd = Args::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    return;
  }

  env_logger::init();

  let sim = SimParams {
    max_particles: args.particles as usize,
    time_scale: args.time_scale,
    ..Default::default()
  };
  let headless = args.headless.then_some(HeadlessOptions {
    frames: args.frames,
    release_frame: args.release_frame,
    frame_time: args.frame_time,
  });
  let options = RunOptions {
    sim,
    camera: CameraParams::default(),
    seed: args.seed,
    headless,
  };

  if let Err(err) = centrifuge_sim::state::run(options) {
    log::error!("{err}");
    process::exit(1);
  }
}
