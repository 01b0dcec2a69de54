//! Man page generator for eepctl
//!
//! Writes `eepctl.1` plus one `eepctl-<command>.1` page per subcommand.
//!
//! Usage: cargo run --bin gen-manpage -- [output-dir]

use clap::CommandFactory;
use std::fs;
use std::path::{Path, PathBuf};

#[path = "../cli.rs"]
#[allow(dead_code)]
mod cli;

fn render(cmd: clap::Command, dir: &Path, name: &str) -> std::io::Result<PathBuf> {
    let mut buffer = Vec::new();
    clap_mangen::Man::new(cmd).title(name).render(&mut buffer)?;

    let path = dir.join(format!("{}.1", name));
    fs::write(&path, buffer)?;
    Ok(path)
}

fn main() -> std::io::Result<()> {
    let output_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("man"));
    fs::create_dir_all(&output_dir)?;

    let mut cmd = cli::Cli::command();
    cmd.build();

    let mut pages = vec![render(cmd.clone(), &output_dir, "eepctl")?];
    for sub in cmd.get_subcommands().filter(|s| s.get_name() != "help") {
        let name = format!("eepctl-{}", sub.get_name());
        pages.push(render(sub.clone(), &output_dir, &name)?);
    }

    for page in &pages {
        println!("Generated {}", page.display());
    }
    println!("\nView with: man -l {}", pages[0].display());

    Ok(())
}
