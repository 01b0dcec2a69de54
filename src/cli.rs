//! CLI argument parsing

use clap::{Parser, Subcommand};
use eepctl_core::DEFAULT_IMAGE_SIZE;
use std::path::PathBuf;

/// Parse an image size like "256", "0x100" or "2 KiB"
pub fn parse_size(s: &str) -> Result<usize, String> {
    let s = s.trim();

    if let Ok(n) = s.parse::<usize>() {
        return Ok(n);
    }

    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        return usize::from_str_radix(hex.trim(), 16)
            .map_err(|e| format!("Invalid hex value: {}", e));
    }

    let s_lower = s.to_lowercase();
    let (num_str, multiplier) = if let Some(n) = s_lower.strip_suffix("kib") {
        (n.trim(), 1024)
    } else if let Some(n) = s_lower.strip_suffix("kb") {
        (n.trim(), 1024)
    } else if let Some(n) = s_lower.strip_suffix('b') {
        (n.trim(), 1)
    } else {
        return Err(format!("invalid size: {}", s));
    };

    let num: usize = num_str
        .parse()
        .map_err(|_| format!("invalid size: {}", s))?;
    Ok(num * multiplier)
}

#[derive(Parser)]
#[command(name = "eepctl")]
#[command(author, version, about = "EEPROM image editor", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Schema file describing the EEPROM layout (JSON, or TOML by extension)
    #[arg(short, long, global = true, default_value = "eeprom.json")]
    pub schema: PathBuf,

    /// Layout to use from the schema file
    ///
    /// Defaults to the only layout, or SysEeprom when there are several
    #[arg(short, long, global = true)]
    pub layout: Option<String>,

    /// EEPROM image file
    #[arg(short, long, global = true, default_value = "syseeprom.bin")]
    pub image: PathBuf,

    /// Image size (e.g., "256", "0x100", "2 KiB")
    #[arg(long, global = true, default_value_t = DEFAULT_IMAGE_SIZE, value_parser = parse_size)]
    pub size: usize,

    /// Don't ask for confirmation before destructive operations
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Display the device info
    Show,

    /// Dump the binary content
    Dump,

    /// Output JSON format
    Json,

    /// Initialize the device info with schema defaults
    Init,

    /// Erase the device info
    Erase {
        /// Erase only the schema block instead of the whole image
        #[arg(long)]
        block: bool,
    },

    /// Update the device info
    Update {
        /// Update the specified field
        #[arg(value_name = "FIELD=VALUE", required = true)]
        fields: Vec<String>,
    },

    /// List the available fields
    Field,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_layout_help_paragraphs() {
        let cmd = Cli::command();
        let layout = cmd
            .get_arguments()
            .find(|arg| arg.get_id() == "layout")
            .unwrap();

        assert_eq!(
            layout.get_help().unwrap().to_string(),
            "Layout to use from the schema file"
        );
        let long_help = layout.get_long_help().unwrap().to_string();
        assert!(long_help.contains("schema file\n\nDefaults to the only layout"));
    }

    #[test]
    fn test_default_size() {
        let cli = Cli::try_parse_from(["eepctl", "dump"]).unwrap();
        assert_eq!(cli.size, DEFAULT_IMAGE_SIZE);
        assert_eq!(
            Cli::try_parse_from(["eepctl", "--size", "0x200", "dump"])
                .unwrap()
                .size,
            512
        );
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("256").unwrap(), 256);
        assert_eq!(parse_size("0x100").unwrap(), 256);
        assert_eq!(parse_size("2 KiB").unwrap(), 2048);
        assert_eq!(parse_size("2kb").unwrap(), 2048);
        assert_eq!(parse_size("512B").unwrap(), 512);
        assert!(parse_size("lots").is_err());
    }

    #[test]
    fn test_parse_update() {
        let cli = Cli::try_parse_from([
            "eepctl",
            "-s",
            "board.toml",
            "update",
            "serial=SN1",
            "model=X",
        ])
        .unwrap();

        assert_eq!(cli.schema, PathBuf::from("board.toml"));
        assert_eq!(cli.image, PathBuf::from("syseeprom.bin"));
        assert_eq!(cli.size, DEFAULT_IMAGE_SIZE);
        match cli.command {
            Some(Commands::Update { fields }) => assert_eq!(fields, ["serial=SN1", "model=X"]),
            _ => panic!("expected update"),
        }
    }

    #[test]
    fn test_update_requires_fields() {
        assert!(Cli::try_parse_from(["eepctl", "update"]).is_err());
    }

    #[test]
    fn test_no_subcommand() {
        let cli = Cli::try_parse_from(["eepctl"]).unwrap();
        assert!(cli.command.is_none());
    }
}
