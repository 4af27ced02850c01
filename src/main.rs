//! Headless streaming demo: walk an observer through the world and log
//! how the chunk pipeline keeps up.

use clap::Parser;
use glam::Vec3;
use tracing::info;

use voxelstream::render::HeadlessBackend;
use voxelstream::session::WorldSession;
use voxelstream::{CHUNK_SIZE, WorldConfig};

/// Voxel world streaming engine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// World seed (random when omitted)
    #[arg(long)]
    seed: Option<u32>,

    /// Load radius in chunks
    #[arg(long, default_value_t = 10)]
    load_radius: i32,

    /// View radius in chunks
    #[arg(long, default_value_t = 8)]
    view_radius: i32,

    /// Simulation radius in chunks
    #[arg(long, default_value_t = 2)]
    simulation_radius: i32,

    /// Number of ticks to run
    #[arg(long, default_value_t = 2000)]
    ticks: usize,

    /// Observer speed in blocks per tick
    #[arg(long, default_value_t = 0.5)]
    speed: f32,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);

    let config = WorldConfig {
        seed,
        load_radius: args.load_radius,
        view_radius: args.view_radius,
        simulation_radius: args.simulation_radius,
        ..WorldConfig::default()
    };

    let mut session = match WorldSession::builder()
        .config(config)
        .render_backend(Box::new(HeadlessBackend::default()))
        .build()
    {
        Ok(session) => session,
        Err(err) => {
            eprintln!("failed to start world session: {}", err);
            std::process::exit(1);
        }
    };

    let surface = session.surface_height(0, 0);
    info!(seed, surface, "world session started");

    let mut observer = Vec3::new(0.0, (surface + 2) as f32, 0.0);
    for tick in 0..args.ticks {
        observer.x += args.speed;
        session.tick(observer);

        if tick % 200 == 0 {
            info!(
                tick,
                chunk = %session.observer_chunk(),
                resident = session.resident_count(),
                meshed = session.meshed_count(),
                colliders = session.collider_count(),
                "streaming"
            );
        }
        std::thread::sleep(std::time::Duration::from_millis(2));
    }

    let walked = observer.x as i32 / CHUNK_SIZE;
    info!(
        chunks_walked = walked,
        resident = session.resident_count(),
        meshed = session.meshed_count(),
        "run complete"
    );
}
