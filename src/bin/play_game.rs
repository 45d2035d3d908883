use std::path::PathBuf;

use minesweeper_kb::config::GameConfig;
use minesweeper_kb::game::agent::{play_game, SafeFirst};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: play_game <config.json>");
        std::process::exit(2);
    }
    let path = PathBuf::from(&args[1]);

    let cfg = match GameConfig::load(&path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };
    let field = match cfg.mine_field() {
        Ok(field) => field,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    let seed = cfg.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);

    let report = match play_game(&field, &SafeFirst, &mut rng, cfg.limits()) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("inference failed: {e}");
            std::process::exit(1);
        }
    };

    let out = serde_json::json!({
        "seed": seed,
        "height": cfg.height,
        "width": cfg.width,
        "mines": field.mine_count(),
        "guesses": report.guesses(),
        "report": report,
    });
    match serde_json::to_string_pretty(&out) {
        Ok(text) => println!("{text}"),
        Err(e) => {
            eprintln!("failed to serialize report: {e}");
            std::process::exit(1);
        }
    }
}
