//! Berth CLI - build convention resolution for multi-module JVM projects

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use berth::core::ConventionError;
use berth::util::context::ManifestError;
use berth::util::diagnostic::{emit, render_report, suggestions, Diagnostic, ManifestSyntaxError};
use berth::util::GlobalContext;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color && std::io::stderr().is_terminal();

    if let Err(e) = run(cli) {
        report(&e, color);
        std::process::exit(1);
    }
}

/// Print an error, using the richest rendering available for its type.
fn report(e: &anyhow::Error, color: bool) {
    if let Some(conv) = e.downcast_ref::<ConventionError>() {
        emit(&conv.to_diagnostic(), color);
    } else if let Some(missing @ ManifestError::NotFound { .. }) = e.downcast_ref::<ManifestError>() {
        emit(
            &Diagnostic::error(missing.to_string()).with_suggestion(suggestions::NO_MANIFEST),
            color,
        );
    } else if let Some(syntax) = e.downcast_ref::<ManifestSyntaxError>() {
        eprint!("{}", render_report(syntax, color));
    } else {
        eprintln!("error: {:#}", e);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("berth=debug")
    } else {
        EnvFilter::new("berth=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let mut gctx = GlobalContext::new()?.with_manifest_path(cli.manifest);
    gctx.set_verbose(cli.verbose);
    gctx.set_color(!cli.no_color);

    match cli.command {
        Commands::Conventions(args) => commands::conventions::execute(args, &gctx),
        Commands::Flags(args) => commands::flags::execute(args, &gctx),
        Commands::Plan(args) => commands::plan::execute(args, &gctx),
        Commands::Check => commands::check::execute(&gctx),
        Commands::Toolchain(args) => commands::toolchain::execute(args, &gctx),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
