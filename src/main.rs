use clap::Parser;

use skald::build::{self, Options};
use skald::config::Config;
use skald::{livereload, watch};

/// A minimal static site generator: markdown content with YAML headers in,
/// templated HTML out.
#[derive(Parser)]
#[command(name = "skald", version, about)]
struct Cli {
    /// Watch for changes and rebuild the site automatically.
    #[arg(short = 'w', long = "watch", visible_alias = "watchdog")]
    watch: bool,

    /// Set on watcher-triggered re-invocations to suppress relaunching the
    /// live-reload companion.
    #[arg(long = "triggered-by-watch", hide = true)]
    triggered_by_watch: bool,
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_root(std::env::current_dir()?);

    build::build_site(&config, &Options { watch: cli.watch })?;

    if cli.watch {
        if !cli.triggered_by_watch {
            livereload::launch(&config.build_root);
        }
        watch::watch(&config)?;
    }
    Ok(())
}
