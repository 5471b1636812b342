use kinsoku_wrap::config::{load_config, CliArgs};
use kinsoku_wrap::script::{self, Input};
use kinsoku_wrap::inspect;

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Read, Write};
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Parse command line arguments
    let args = CliArgs::parse();

    // Load configuration
    let config = load_config(&args)?;

    init_logging(&config.log_level);

    if args.debug_config {
        println!("Configuration:");
        println!("{:#?}", config);
        return Ok(());
    }

    let rules = config.ruleset()?;
    let wrapper = config.wrapper(&rules);

    let input = match config.input {
        Some(ref path) if config.script_mode => Input::Script(script::load_script(path)?),
        Some(ref path) => script::load_input(path)?,
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            if config.script_mode {
                Input::Script(script::parse_script(&text, Path::new("<stdin>"))?)
            } else {
                Input::Plain(text)
            }
        }
    };

    let (rendered, report) = script::render_input(input, &wrapper)?;

    match config.output {
        Some(ref path) => script::write_output(path, &rendered)?,
        None if args.inspect => {}
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }

    if args.inspect {
        for line in inspect::report_lines(&report) {
            println!("{line}");
        }
    }

    if args.count {
        eprintln!(
            "visible characters: {} ({} blocks, longest {} lines)",
            report.visible_count(),
            report.blocks.len(),
            report.max_line_count()
        );
    }

    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}
