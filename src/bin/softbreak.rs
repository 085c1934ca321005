// Softbreak CLI
// Replays scripted keystroke sessions against the demo composer page

use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use softbreak::script::{self, Session};
use softbreak::settings::{default_settings_content, Settings};

/// Composer Enter-key interception demo driver
#[derive(Parser, Debug)]
#[command(name = "softbreak")]
#[command(version)]
#[command(about = "Replay keystroke scripts through the Enter interception engine", long_about = None)]
struct Args {
    /// TOML settings file (default: ~/.config/softbreak/settings.toml)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Keystroke script to replay (default: read from stdin)
    #[arg(short, long, value_name = "SCRIPT")]
    script: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Validate the settings file and exit
    #[arg(long)]
    check_config: bool,

    /// Print the default settings TOML and exit
    #[arg(long)]
    dump_default_config: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if args.dump_default_config {
        print!("{}", default_settings_content());
        return Ok(());
    }

    let settings = match &args.config {
        Some(path) => Settings::from_file(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::load_default().context("loading default settings")?,
    };

    if args.check_config {
        println!("Configuration is valid");
        let config = settings.send_keys();
        println!("  Alt+Enter sends:   {}", config.alt);
        println!("  Shift+Enter sends: {}", config.shift);
        println!("  Ctrl+Enter sends:  {}", config.ctrl);
        println!("  Meta+Enter sends:  {}", config.meta);
        return Ok(());
    }

    let source = match &args.script {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading script from stdin")?;
            buf
        }
    };
    let steps = script::parse(&source)?;

    let mut session = Session::new(settings);
    for report in session.run(&steps) {
        println!("{}", report);
    }
    println!("---");
    print!("{}", session.summary());
    Ok(())
}
