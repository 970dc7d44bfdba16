//! Command-line entry for taskman
//!
//! The launch surface is intentionally small: the program is interactive
//! after startup, so clap only handles where the data directory lives.

use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;
use crate::credential::CredentialStore;
use crate::error::Result;
use crate::menu;
use crate::storage::Storage;
use crate::task::TaskStore;

/// taskman - flat-file task and user manager
///
/// Loads the credential and task stores from the data directory, then runs
/// the interactive login and menu loop on stdin/stdout.
#[derive(Parser, Debug)]
#[command(name = "taskman")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the backing artifacts (defaults to the current directory)
    #[arg(long, env = "TASKMAN_DATA_DIR")]
    pub data_dir: Option<PathBuf>,
}

impl Cli {
    /// Execute the CLI: load stores, then hand over to the interactive menu
    pub fn run(self) -> Result<()> {
        let data_dir = match self.data_dir {
            Some(dir) => dir,
            None => std::env::current_dir()?,
        };

        let config = Config::load_from_dir(&data_dir);
        let storage = Storage::new(data_dir, config.storage.clone());
        storage.init()?;

        let mut users = CredentialStore::load(
            storage.clone(),
            &config.auth.admin_name,
            &config.auth.admin_secret,
        )?;
        let mut tasks = TaskStore::load(storage.clone())?;

        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        let mut input = stdin.lock();
        let mut out = stdout.lock();

        menu::run(
            &mut users,
            &mut tasks,
            &storage,
            &config.auth.admin_name,
            &mut input,
            &mut out,
        )
    }
}
