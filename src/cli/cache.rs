//! Cache command: inspects and clears stored state.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::store::StorePaths;

/// Cache operations.
#[derive(Parser)]
pub struct CacheCommand {
    /// Cache subcommand to execute.
    #[command(subcommand)]
    pub command: CacheSubcommands,
}

/// Cache subcommands.
#[derive(Subcommand)]
pub enum CacheSubcommands {
    /// Deletes cached extractions and saved sessions.
    Clear,
    /// Prints where cached extractions and sessions are stored.
    Path,
}

impl CacheCommand {
    /// Executes the cache command.
    pub fn execute(self) -> Result<()> {
        let paths = StorePaths::default_paths()?;
        match self.command {
            CacheSubcommands::Clear => {
                let removed = paths.clear()?;
                println!("Removed {removed} stored file(s)");
            }
            CacheSubcommands::Path => {
                println!("cache: {}", paths.cache.display());
                println!("sessions: {}", paths.sessions.display());
            }
        }
        Ok(())
    }
}
