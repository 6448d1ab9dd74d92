//! meraki-health-check CLI entry point
//!
//! Audits Meraki dashboard configuration against policy thresholds.

use clap::Parser;
use meraki_health_check::cli::args::{Args, Command};
use meraki_health_check::cli::output::get_formatter;
use meraki_health_check::engine::orchestrator::{CheckGroup, CheckRegistry};
use meraki_health_check::logging::init_tracing;
use meraki_health_check::version::get_build_info;
use meraki_health_check::{run_health_check, AuditError, Config};

use std::process::ExitCode;

/// Configuration or client construction failed
const EXIT_RUNTIME_ERROR: u8 = 3;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match args.command() {
        Command::Version => {
            println!("{}", get_build_info());
            ExitCode::SUCCESS
        }
        Command::List => {
            print_check_list();
            ExitCode::SUCCESS
        }
        Command::Run => match run(&args).await {
            Ok(code) => ExitCode::from(code),
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::from(EXIT_RUNTIME_ERROR)
            }
        },
    }
}

fn print_check_list() {
    let registry = CheckRegistry::standard();
    println!("Available checks:");

    for group in [
        CheckGroup::Organization,
        CheckGroup::Network,
        CheckGroup::SwitchNetwork,
        CheckGroup::SwitchDevice,
    ] {
        println!();
        println!("{} checks:", group.label().to_uppercase());
        for check in registry.checks(group) {
            println!(
                "  {:<22} {:<10} {}",
                check.name,
                check.scope.as_str(),
                check.description
            );
        }
    }
}

async fn run(args: &Args) -> Result<u8, AuditError> {
    let mut config = Config::load(&args.config)?;
    if let Some(timeout) = args.timeout {
        config.api.network_timeout = Some(timeout);
        config.validate()?;
    }

    let tree = run_health_check(&config).await?;

    let formatter = get_formatter(args.format, args.use_color(), args.verbose, args.quiet);
    let rendered = formatter.format(&tree);

    match &args.output {
        Some(path) => {
            std::fs::write(path, format!("{}\n", rendered)).map_err(|source| AuditError::Output {
                path: path.clone(),
                source,
            })?;
            eprintln!("Report written to {}", path.display());
        }
        None => println!("{}", rendered),
    }

    Ok(tree.summary().exit_code())
}
