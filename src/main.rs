use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use onsave::actions::controller::TriggerController;
use onsave::actions::history::HistoryStore;
use onsave::actions::store::RonStateFile;
use onsave::config::{self, Config, Overrides};
use onsave::data::state::AppState;
use onsave::logging;
use onsave::ui::app::{self, App};
use onsave::watch::{SaveFilter, SaveWatcher};

/// Terminal that re-runs a picked command whenever a file is saved
#[derive(Parser, Debug)]
#[command(name = "onsave")]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory to watch and to start the shell in
    #[arg(value_name = "DIR", default_value = ".")]
    dir: PathBuf,

    /// Config file (default: <config_dir>/onsave/config.ron)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Line sent before every command, e.g. "clear"
    #[arg(long, value_name = "CMD")]
    run_first: Option<String>,

    /// Keep sent commands out of the shell history
    #[arg(long)]
    bypass_history: bool,

    /// Where the command history is stored
    #[arg(long, value_name = "PATH")]
    state_file: Option<PathBuf>,

    /// Log file (default: <data_dir>/onsave/onsave.log)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Shell program for the embedded terminal
    #[arg(long, value_name = "PROGRAM")]
    shell: Option<String>,
}

fn main() {
    let args = Args::parse();

    let log_file = args.log_file.unwrap_or_else(config::default_log_file);
    if let Err(e) = logging::init(&log_file) {
        eprintln!("Error opening log file {}: {}", log_file.display(), e);
        std::process::exit(1);
    }

    let workspace = match args.dir.canonicalize() {
        Ok(dir) if dir.is_dir() => dir,
        Ok(dir) => {
            eprintln!("Error: {} is not a directory", dir.display());
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error opening {}: {}", args.dir.display(), e);
            std::process::exit(1);
        }
    };

    let mut config = match Config::discover(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };
    config.apply(Overrides {
        run_first: args.run_first,
        bypass_history: args.bypass_history,
        shell: args.shell,
        state_file: args.state_file,
    });

    let state_file = config.state_file();
    info!(
        workspace = %workspace.display(),
        state_file = %state_file.display(),
        "Starting"
    );

    let state_store = RonStateFile::new(state_file);

    // Our own writes must not look like saves.
    let mut excluded: Vec<PathBuf> = state_store
        .written_paths()
        .iter()
        .map(|p| resolve(p))
        .collect();
    excluded.push(resolve(&log_file));
    let filter = SaveFilter::new(config.ignore.clone(), excluded);
    let watcher = match SaveWatcher::new(&workspace, filter) {
        Ok(w) => Some(w),
        Err(e) => {
            warn!(error = %e, "Not watching for saves");
            None
        }
    };

    let mut app = App {
        controller: TriggerController::new(config.trigger_options()),
        history: HistoryStore::new(state_store),
        watcher,
        save_all_hook: config.save_all_hook.clone(),
        shell: config.shell.clone(),
    };
    let mut state = AppState::new(workspace);

    if let Err(e) = app::run(&mut state, &mut app) {
        eprintln!("Error running TUI: {}", e);
        std::process::exit(1);
    }
    info!("Exiting");
}

/// Absolute, symlink-free form of `path`, which may not exist yet.
fn resolve(path: &Path) -> PathBuf {
    if let Ok(resolved) = path.canonicalize() {
        return resolved;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => parent
            .canonicalize()
            .map(|p| p.join(name))
            .unwrap_or_else(|_| path.to_path_buf()),
        _ => path.to_path_buf(),
    }
}
