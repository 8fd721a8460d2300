use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use crate::config::load_config;
use crate::layout::{layout_document, resolve_collisions, Layout, LayoutOptions};
use crate::model::{Algorithm, Direction, Document};

#[derive(Parser, Debug)]
#[command(name = "flowlayout", version, about = "Automatic layout for node/edge diagrams")]
pub struct Args {
    /// Input document (.json) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Layout algorithm (layered, tree, grid, force, radial, stress, ranked,
    /// hierarchy, cluster). Unknown names use the layered default.
    #[arg(short = 'a', long = "algorithm", default_value = "layered")]
    pub algorithm: String,

    /// Flow direction (down, up, left, right)
    #[arg(short = 'd', long = "direction", default_value = "right")]
    pub direction: String,

    /// Spacing between siblings, in pixels
    #[arg(long = "node-spacing", default_value_t = 60.0)]
    pub node_spacing: f32,

    /// Spacing between ranks, in pixels
    #[arg(long = "rank-spacing", default_value_t = 80.0)]
    pub rank_spacing: f32,

    /// Config JSON file overriding sizing defaults
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Push overlapping siblings apart after layout
    #[arg(long = "resolve-collisions", default_value_t = false)]
    pub resolve_collisions: bool,

    /// Pretty-print the output JSON
    #[arg(long = "pretty", default_value_t = false)]
    pub pretty: bool,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    let raw = read_input(args.input.as_deref())?;
    let doc = Document::from_str(&raw).context("failed to parse input document")?;

    let options = LayoutOptions {
        direction: Direction::from_token(&args.direction),
        spacing: (args.node_spacing, args.rank_spacing),
        algorithm: Algorithm::from_name(&args.algorithm),
    };

    let mut layout = layout_document(&doc, &options, &config);
    if args.resolve_collisions {
        layout.nodes = resolve_collisions(&layout.nodes, &config.collision, &config);
    }

    write_output(&layout, args.output.as_deref(), args.pretty)
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()));
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn write_output(layout: &Layout, path: Option<&Path>, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(layout)?
    } else {
        serde_json::to_string(layout)?
    };
    match path {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(json.as_bytes())?;
            handle.write_all(b"\n")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_map_onto_layout_options() {
        let args = Args::try_parse_from([
            "flowlayout",
            "-i",
            "diagram.json",
            "-a",
            "radial",
            "-d",
            "down",
            "--node-spacing",
            "32",
        ])
        .unwrap();
        assert_eq!(Algorithm::from_name(&args.algorithm), Algorithm::Radial);
        assert_eq!(Direction::from_token(&args.direction), Direction::Down);
        assert_eq!(args.node_spacing, 32.0);
        assert_eq!(args.rank_spacing, 80.0);
        assert!(!args.resolve_collisions);
    }

    #[test]
    fn unknown_tokens_use_the_defaults() {
        let args =
            Args::try_parse_from(["flowlayout", "-a", "quantum", "-d", "diagonal"]).unwrap();
        assert_eq!(Algorithm::from_name(&args.algorithm), Algorithm::Layered);
        assert_eq!(Direction::from_token(&args.direction), Direction::Right);
    }
}
