use chrono::Utc;
use clap::Parser;
use std::fs;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::time::Instant;
use ts2pydantic::{Config, Converter, with_banner};

#[derive(Parser)]
#[command(name = "ts2pydantic")]
#[command(about = "Convert TypeScript type declarations to Pydantic models")]
struct Cli {
    /// Path to the JSON configuration document
    #[arg(default_value = "./config.json")]
    config: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    let start = Instant::now();

    eprintln!("Reading configuration: {}", cli.config.display());
    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => fail(&e.to_string()),
    };

    let root = cli
        .config
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    let converter = Converter::new(config, root);

    eprintln!("Declaration files:");
    for file in converter.input_files() {
        eprintln!("  - {}", file.display());
    }

    let result = match converter.run() {
        Ok(result) => result,
        Err(e) => fail(&e.to_string()),
    };

    for warning in &result.warnings {
        print_warning(warning);
    }

    eprintln!("Extracted {} type declarations:", result.declarations.len());
    for decl in &result.declarations {
        eprintln!("  - {} ({})", decl.name, decl.kind);
    }

    let output_path = converter.output_path();
    if let Some(dir) = output_path.parent() {
        if let Err(e) = fs::create_dir_all(dir) {
            fail(&format!("cannot create {}: {}", dir.display(), e));
        }
    }

    let code = with_banner(&result.code, Utc::now());
    if let Err(e) = fs::write(&output_path, &code) {
        fail(&format!("cannot write {}: {}", output_path.display(), e));
    }
    print_generated(&output_path.display().to_string());

    print_summary(result.declarations.len(), start.elapsed());
}

fn fail(message: &str) -> ! {
    eprintln!("error: {}", message);
    std::process::exit(1);
}

fn print_warning(message: &str) {
    if io::stderr().is_terminal() {
        eprintln!("  \x1b[33m⚠\x1b[0m {}", message);
    } else {
        eprintln!("  warning: {}", message);
    }
}

fn print_generated(path: &str) {
    if io::stderr().is_terminal() {
        eprintln!("  \x1b[32m✓\x1b[0m {}", path);
    } else {
        eprintln!("  ✓ {}", path);
    }
}

fn print_summary(count: usize, elapsed: std::time::Duration) {
    let time_str = format_duration(elapsed);
    let models_word = if count == 1 { "model" } else { "models" };

    if io::stderr().is_terminal() {
        eprintln!("\n\x1b[1m✨ Generated {} {} in {}\x1b[0m", count, models_word, time_str);
    } else {
        eprintln!("\n✨ Generated {} {} in {}", count, models_word, time_str);
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let micros = d.as_micros();
    if micros < 1000 {
        format!("{}μs", micros)
    } else if micros < 1_000_000 {
        format!("{:.1}ms", micros as f64 / 1000.0)
    } else {
        format!("{:.2}s", d.as_secs_f64())
    }
}
