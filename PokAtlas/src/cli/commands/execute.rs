//! Command execution implementations

use super::Commands;
use super::{atlas, export, sprite};

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the underlying command fails.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Info { descriptor, sprites } => atlas::info(descriptor, *sprites),
            Commands::Decompose { descriptor, quiet } => atlas::decompose(descriptor, *quiet),
            Commands::Rebuild {
                descriptor,
                output,
                quiet,
            } => atlas::rebuild(descriptor, output.as_deref(), *quiet),
            Commands::Status { descriptor } => atlas::status(descriptor),
            Commands::Replace {
                descriptor,
                key,
                file,
            } => sprite::replace(descriptor, key, file),
            Commands::MassReplace { descriptor, dir } => sprite::mass_replace(descriptor, dir),
            Commands::Export {
                descriptor,
                partial,
                quiet,
            } => export::export(descriptor, *partial, *quiet),
        }
    }
}
