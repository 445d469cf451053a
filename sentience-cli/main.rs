use clap::Parser;
use image::ImageReader;
use sentience_cli::{mono_from_rgb, FeaturePipeline, PipelineConfig, SentienceResult};
use sentience_core::init_thread_pool;
use std::path::PathBuf;
use std::time::Instant;

/// Detect corners, lines and the horizon in an image
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Image to analyse
    image: PathBuf,

    /// Pipeline configuration (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the detector barrier (1-127)
    #[arg(short, long)]
    barrier: Option<u8>,

    /// Override the segment-test arc length (9 or 10)
    #[arg(short, long)]
    arc: Option<usize>,

    /// Worker threads (defaults to the number of CPUs)
    #[arg(short, long)]
    threads: Option<usize>,

    /// Print the whole frame as JSON instead of a summary
    #[arg(long)]
    json: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> SentienceResult<()> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::load_toml(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(barrier) = args.barrier {
        config.detector.barrier = barrier;
    }
    if let Some(arc) = args.arc {
        config.detector.arc_length = arc;
    }
    if args.threads.is_some() {
        config.detector.threads = args.threads;
    }

    let n_threads = config.detector.threads.unwrap_or_else(num_cpus::get);
    init_thread_pool(n_threads)?;

    let rgb = ImageReader::open(&args.image)?.decode()?.to_rgb8();
    let img = mono_from_rgb(&rgb);
    log::info!("loaded {} ({}x{})", args.image.display(), img.width(), img.height());

    let pipeline = FeaturePipeline::new(&config, img.width(), img.height())?;

    let t0 = Instant::now();
    let frame = pipeline.process(&img)?;
    let elapsed = t0.elapsed();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&frame)?);
    } else {
        println!("Time taken: {:.2?}", elapsed);
        println!("{}", frame.summary());
    }
    Ok(())
}
