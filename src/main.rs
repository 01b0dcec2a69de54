//! eepctl - Schema-driven EEPROM image editor
//!
//! Inspects and programs the persistent configuration block of a device,
//! mirrored on the host as a fixed-size binary image. The layout of the
//! image (field names, offsets, sizes and defaults) comes from a schema file.
//!
//! # Exit codes
//!
//! - `0` - success, or a destructive command was declined
//! - `1` - no command given, or the schema could not be loaded
//! - `2` - invalid arguments, unknown fields, or an I/O failure

mod cli;
mod commands;
mod confirm;

use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use commands::CommandError;
use confirm::{AssumeYes, Confirm, StdinConfirm};
use eepctl_core::{FieldCodec, Image, Schema, SchemaDocument};
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logger, -v/-vv raise the default level
    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let Some(command) = cli.command else {
        let _ = Cli::command().print_help();
        return ExitCode::from(1);
    };

    let schema = match load_schema(&cli.schema, cli.layout.as_deref()) {
        Ok(schema) => schema,
        Err(e) => {
            eprintln!("Failed to load schema {}: {}", cli.schema.display(), e);
            return ExitCode::from(1);
        }
    };

    log::debug!(
        "Image {} ({} bytes), {} field(s)",
        cli.image.display(),
        cli.size,
        schema.fields.len()
    );

    let mut image = Image::new(&cli.image, cli.size);
    let mut codec = FieldCodec::new(schema, &mut image);
    let mut confirm: Box<dyn Confirm> = if cli.yes {
        Box::new(AssumeYes)
    } else {
        Box::new(StdinConfirm)
    };

    match run(command, &mut codec, confirm.as_mut()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e);
            ExitCode::from(e.exit_code())
        }
    }
}

/// Load the schema file and pick the requested layout
fn load_schema(path: &Path, layout: Option<&str>) -> eepctl_core::Result<Schema> {
    let schema = SchemaDocument::from_file(path)?.select(layout)?;
    log::debug!("Loaded schema from {}", path.display());
    Ok(schema)
}

/// Dispatch one command
fn run(
    command: Commands,
    codec: &mut FieldCodec<'_>,
    confirm: &mut dyn Confirm,
) -> Result<(), CommandError> {
    match command {
        Commands::Show => commands::cmd_show(codec),
        Commands::Dump => commands::cmd_dump(codec),
        Commands::Json => commands::cmd_json(codec),
        Commands::Field => {
            commands::cmd_field(codec);
            Ok(())
        }
        Commands::Init => commands::cmd_init(codec, confirm).map(|_| ()),
        Commands::Erase { block } => commands::cmd_erase(codec, confirm, block).map(|_| ()),
        Commands::Update { fields } => commands::cmd_update(codec, &fields),
    }
}

/// Print a command error the way the user can act on it
fn report_error(err: &CommandError) {
    eprintln!("eepctl: {}", err);

    match err {
        CommandError::Usage(_) => {
            let mut cmd = Cli::command();
            if let Some(update) = cmd.find_subcommand_mut("update") {
                let _ = update.print_help();
            }
        }
        CommandError::UnknownField { .. } => {}
        CommandError::Core(_) | CommandError::Io(_) => {
            eprintln!("        for help use --help");
        }
    }
}
