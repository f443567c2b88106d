//! quotecard - quote card image generator CLI
//!
//! Renders a quote card from command-line text using the configured fonts,
//! grid and emoji catalog, and writes the result as a PNG file.

use anyhow::{bail, Context, Result};
use log::info;
use std::path::{Path, PathBuf};

use quotecard::Config;

fn print_help() {
    println!(
        "quotecard {}

Usage: quotecard [OPTIONS]

Options:
  --config PATH    Config file (default: ~/.config/quotecard/config.toml)
  --init-config    Write the default config file and exit
  --title TEXT     Card title
  --text TEXT      Quote body (\\n for line breaks)
  --author TEXT    Author name
  --avatar PATH    Author avatar image (PNG or JPEG)
  --out PATH       Output PNG path (default: timestamped file)
  --debug          Draw the region/grid overlay
  -h, --help       Show this help
  -V, --version    Show version",
        env!("CARGO_PKG_VERSION")
    );
}

/// Value of a `--flag VALUE` argument pair
fn arg_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("quotecard {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let config_path = arg_value(&args, "--config").map(PathBuf::from);

    if args.iter().any(|a| a == "--init-config") {
        let path = match config_path {
            Some(p) => p,
            None => Config::default_path().context("no config directory available")?,
        };
        if path.exists() {
            bail!("config file already exists: {}", path.display());
        }
        Config::write_default(&path)?;
        println!("Config written to {}", path.display());
        return Ok(());
    }

    let mut config = Config::load(config_path.as_deref())?;
    if args.iter().any(|a| a == "--debug") {
        config.debug.enabled = true;
    }

    let title = arg_value(&args, "--title").unwrap_or_else(|| "Quotes of great people".to_string());
    let text = arg_value(&args, "--text")
        .unwrap_or_else(|| "The only way to do great work\nis to love what you do.".to_string())
        .replace("\\n", "\n");
    let author = arg_value(&args, "--author").unwrap_or_else(|| "© Unknown".to_string());

    let avatar_path = arg_value(&args, "--avatar").context("--avatar PATH is required")?;
    let avatar = std::fs::read(&avatar_path)
        .with_context(|| format!("failed to read avatar {}", avatar_path))?;

    let out_path = arg_value(&args, "--out").unwrap_or_else(|| {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        format!("quotecard_{}.png", timestamp)
    });

    let generator = config.build_generator()?;
    let png = generator.generate(&title, &text, &author, &avatar, &[])?;

    std::fs::write(Path::new(&out_path), png)
        .with_context(|| format!("failed to write {}", out_path))?;
    info!("card written to {}", out_path);
    println!("{}", out_path);

    Ok(())
}
