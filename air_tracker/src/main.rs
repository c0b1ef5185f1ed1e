//! air_tracker — interactive entry point.

use air_tracker::app::{run, AppConfig, ClassifierBackend};
use hand_gesture::CooldownConfig;
use std::io::{self, Write};
use std::time::Duration;

fn main() {
    env_logger::init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║        Air Tracker — Hand-Gesture Presentation Control       ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    #[cfg(feature = "camera")]
    println!("  Mode: webcam capture");
    #[cfg(not(feature = "camera"))]
    println!("  Mode: keyboard/mouse simulation  (use --features camera for a webcam)");
    println!();

    let args: Vec<String> = std::env::args().collect();
    let cfg = if args.iter().any(|a| a == "--quick") {
        println!("  Quick-start: pattern backend, stock cooldowns\n");
        AppConfig::default()
    } else if args.iter().any(|a| a == "--pinch") {
        println!("  Pinch-distance backend, stock cooldowns\n");
        AppConfig { backend: ClassifierBackend::Pinch, ..AppConfig::default() }
    } else {
        configure_interactively()
    };

    println!();
    println!("  Opening tracker window…");
    println!();

    if let Err(e) = run(cfg) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn configure_interactively() -> AppConfig {
    println!("  Recognition backend:");
    println!("    1. Pattern table (finger extension poses)");
    println!("    2. Pinch distance (thumb/index fingertips)");
    let backend = match read_line("  Choice (default 1): ").trim() {
        "2" => ClassifierBackend::Pinch,
        _   => ClassifierBackend::Pattern,
    };

    let mut cooldowns = CooldownConfig::default();
    println!("  Zoom-out cooldown:");
    println!("    1. 3000 ms (steady)   2. 1500 ms (snappy)");
    if read_line("  Choice (default 1): ").trim() == "2" {
        cooldowns.zoom_out = Duration::from_millis(1500);
    }
    let nav: u64 = read_line("  Slide-nav cooldown ms (default 1000): ")
        .trim()
        .parse()
        .unwrap_or(1000);
    cooldowns.slide_nav = Duration::from_millis(nav.clamp(100, 10_000));

    let pinch_threshold = if backend == ClassifierBackend::Pinch {
        let t: f32 = read_line("  Pinch threshold 0.01–0.20 (default 0.05): ")
            .trim()
            .parse()
            .unwrap_or(0.05);
        t.clamp(0.01, 0.20)
    } else {
        0.05
    };

    AppConfig { cooldowns, backend, pinch_threshold, ..AppConfig::default() }
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf
}
