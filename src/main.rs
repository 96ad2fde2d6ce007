use clap::{Parser, Subcommand};
use fractree::config::{GrowConfig, TreeOverrides};
use fractree::geometry::Point;
use fractree::settings::Settings;
use log::warn;

const DEFAULT_TICKS_PER_LEVEL: u32 = 8;

#[derive(Parser)]
#[command(name = "fractree")]
#[command(author = "Terminal Art Generator")]
#[command(version)]
#[command(about = "Terminal fractal tree that grows one level at a time", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grow a fractal tree
    Grow {
        /// Show live growth animation
        #[arg(short, long)]
        live: bool,

        /// Keep growing new trees infinitely
        #[arg(short, long)]
        infinite: bool,

        /// Print tree to stdout (no interactive display)
        #[arg(short, long)]
        print: bool,

        /// Animation step delay in seconds
        #[arg(short, long, default_value = "0.05")]
        time: f32,

        /// Wait time between trees in infinite mode (seconds)
        #[arg(short, long, default_value = "4.0")]
        wait: f64,

        /// Ticks between growth levels
        #[arg(short = 'k', long)]
        ticks: Option<u32>,

        /// Random seed for reproducibility
        #[arg(short, long)]
        seed: Option<u64>,

        /// Children per branch
        #[arg(short, long)]
        branches: Option<usize>,

        /// Depth at which growth stops and leaves appear
        #[arg(short, long)]
        depth: Option<u32>,

        /// Depth the root starts at
        #[arg(long)]
        start_depth: Option<u32>,

        /// Trunk length in braille dots
        #[arg(long)]
        length: Option<f64>,

        /// Length shrink per level (0-1)
        #[arg(long)]
        length_factor: Option<f64>,

        /// Fan-out shrink per level (0-1)
        #[arg(long)]
        angle_factor: Option<f64>,

        /// Trunk direction in radians (-1.5708 points up)
        #[arg(long, allow_hyphen_values = true)]
        angle: Option<f64>,

        /// Root position in braille dots, as X,Y
        #[arg(long, value_parser = parse_point)]
        root: Option<Point>,

        /// Print mode width in cells
        #[arg(long)]
        width: Option<u16>,

        /// Print mode height in cells
        #[arg(long)]
        height: Option<u16>,
    },
}

fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got {:?}", s))?;
    let x = x.trim().parse::<f64>().map_err(|e| e.to_string())?;
    let y = y.trim().parse::<f64>().map_err(|e| e.to_string())?;
    Ok(Point::new(x, y))
}

fn main() -> fractree::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("error")).init();

    let cli = Cli::parse();

    let settings = Settings::load().unwrap_or_else(|e| {
        warn!("{}; using defaults", e);
        Settings::default()
    });

    match cli.command {
        Commands::Grow {
            live,
            infinite,
            print,
            time,
            wait,
            ticks,
            seed,
            branches,
            depth,
            start_depth,
            length,
            length_factor,
            angle_factor,
            angle,
            root,
            width,
            height,
        } => {
            let cli_tree = TreeOverrides {
                root,
                start_length: length,
                length_factor,
                start_angle: angle,
                angle_factor,
                branch_factor: branches,
                start_depth,
                terminal_depth: depth,
            };
            let size = match (width, height) {
                (None, None) => None,
                (w, h) => {
                    let (tw, th) = fractree::terminal::Terminal::detect_size();
                    Some((w.unwrap_or(tw).max(1), h.unwrap_or(th).max(2)))
                }
            };
            let config = GrowConfig {
                live,
                infinite,
                print,
                time_step: time,
                time_wait: wait,
                ticks_per_level: ticks
                    .or(settings.tree.ticks_per_level)
                    .unwrap_or(DEFAULT_TICKS_PER_LEVEL),
                seed,
                size,
                tree: cli_tree.or(&settings.tree_overrides()),
                colors: settings.color_scheme(),
            };
            fractree::grow::run(config)?;
        }
    }

    Ok(())
}
