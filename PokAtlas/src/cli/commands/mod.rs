//! CLI command definitions

use std::path::PathBuf;

use clap::Subcommand;

pub mod atlas;
pub mod execute;
pub mod export;
pub mod sprite;

#[derive(Subcommand)]
pub enum Commands {
    /// Show the atlas header and sprite table
    Info {
        /// Atlas descriptor file
        descriptor: PathBuf,

        /// List every sprite
        #[arg(short, long)]
        sprites: bool,
    },

    /// Split the atlas image into one PNG per sprite and record baselines
    Decompose {
        /// Atlas descriptor file
        descriptor: PathBuf,

        /// Suppress progress bar
        #[arg(short, long)]
        quiet: bool,
    },

    /// Recompose the atlas image from the sprite files
    Rebuild {
        /// Atlas descriptor file
        descriptor: PathBuf,

        /// Output directory (defaults to the configured output path)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Suppress progress bar
        #[arg(short, long)]
        quiet: bool,
    },

    /// List duplicate groups and edited sprites
    Status {
        /// Atlas descriptor file
        descriptor: PathBuf,
    },

    /// Replace one sprite's file
    Replace {
        /// Atlas descriptor file
        descriptor: PathBuf,

        /// Sprite key (e.g. `walk_0`)
        key: String,

        /// Replacement PNG
        file: PathBuf,
    },

    /// Replace every sprite that has a matching `{key}.png` in a folder
    MassReplace {
        /// Atlas descriptor file
        descriptor: PathBuf,

        /// Folder of replacement PNGs
        dir: PathBuf,
    },

    /// Package the atlas as a zipped mod
    Export {
        /// Atlas descriptor file
        descriptor: PathBuf,

        /// Only include sprites edited since decompose
        #[arg(long)]
        partial: bool,

        /// Suppress progress bar
        #[arg(short, long)]
        quiet: bool,
    },
}
