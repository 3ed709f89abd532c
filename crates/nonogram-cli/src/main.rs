mod app;
mod catalog;
mod render;
mod storage;

use app::{App, AppAction};
use catalog::FileTransport;
use clap::{Parser, Subcommand};
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use nonogram_core::storage::USER_BOARD_PREFIX;
use nonogram_core::{CatalogClient, ProgressStore, Task};
use rand::seq::SliceRandom;
use std::error::Error;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use storage::FileStorage;

/// How many records to request from the list endpoint.
const CATALOG_COUNT: u32 = 500;

/// Play nonogram puzzles from the terminal.
#[derive(Parser)]
#[command(name = "nonogram", version, about)]
struct Cli {
    /// Path to a saved list-endpoint response (default: tasks.json in
    /// the data dir)
    #[arg(long)]
    tasks: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the catalog with completion markers
    List {
        /// Show at most this many puzzles
        #[arg(long, default_value_t = 50)]
        count: usize,
    },
    /// Print a puzzle's clue sets
    Show { id: u32 },
    /// Play a puzzle
    Play { id: u32 },
    /// Play a random unsolved puzzle
    Random,
    /// Show completion records
    Progress,
    /// Erase the completion record for a puzzle
    Clear { id: u32 },
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let tasks_path = cli.tasks.unwrap_or_else(catalog::default_tasks_path);
    match cli.command {
        Command::List { count } => cmd_list(&tasks_path, count),
        Command::Show { id } => cmd_show(&tasks_path, id),
        Command::Play { id } => play(find_task(&tasks_path, id)?),
        Command::Random => cmd_random(&tasks_path),
        Command::Progress => cmd_progress(),
        Command::Clear { id } => cmd_clear(id),
    }
}

fn load_catalog(tasks_path: &Path) -> Result<CatalogClient<FileTransport>, Box<dyn Error>> {
    let mut client = CatalogClient::new(FileTransport::new(tasks_path.to_path_buf()));
    client.fetch_tasks(CATALOG_COUNT)?;
    Ok(client)
}

fn find_task(tasks_path: &Path, id: u32) -> Result<Task, Box<dyn Error>> {
    let client = load_catalog(tasks_path)?;
    client
        .get_task_by_id(id)
        .cloned()
        .ok_or_else(|| format!("no puzzle with id {} in the catalog", id).into())
}

fn cmd_list(tasks_path: &Path, count: usize) -> Result<(), Box<dyn Error>> {
    let client = load_catalog(tasks_path)?;
    let store = FileStorage::open_default();
    let mut progress = ProgressStore::new();

    println!("{:>5}  {:<24} {:>7}  done", "id", "name", "size");
    for task in client.tasks().iter().take(count) {
        let record = progress.get_by_puzzle_id(&store, task.id);
        let done = if record.game_completed {
            format!("✓ {} {}", record.time, stars_string(record.stars))
        } else {
            String::new()
        };
        println!(
            "{:>5}  {:<24} {:>3}x{:<3}  {}",
            task.id, task.name, task.width, task.height, done
        );
    }
    Ok(())
}

fn cmd_show(tasks_path: &Path, id: u32) -> Result<(), Box<dyn Error>> {
    let task = find_task(tasks_path, id)?;
    print!("{}", render::format_clues(&task)?);
    Ok(())
}

fn cmd_random(tasks_path: &Path) -> Result<(), Box<dyn Error>> {
    let client = load_catalog(tasks_path)?;
    let store = FileStorage::open_default();
    let mut progress = ProgressStore::new();

    let unsolved: Vec<&Task> = client
        .tasks()
        .iter()
        .filter(|task| !progress.get_by_puzzle_id(&store, task.id).game_completed)
        .collect();

    match unsolved.choose(&mut rand::thread_rng()) {
        Some(task) => play((*task).clone()),
        None => {
            println!("Every puzzle in the catalog is solved.");
            Ok(())
        }
    }
}

fn cmd_progress() -> Result<(), Box<dyn Error>> {
    let store = FileStorage::open_default();
    let mut progress = ProgressStore::new();

    let keys = store.keys_with_prefix(USER_BOARD_PREFIX);
    let mut shown = 0;
    for key in keys {
        let Ok(id) = key[USER_BOARD_PREFIX.len()..].parse::<u32>() else {
            continue;
        };
        let record = progress.get_by_puzzle_id(&store, id);
        if record.game_completed {
            if shown == 0 {
                println!("{:>5}  {:>8}  stars", "id", "time");
            }
            println!("{:>5}  {:>8}  {}", id, record.time, stars_string(record.stars));
            shown += 1;
        }
    }
    if shown == 0 {
        println!("No puzzles completed yet.");
    }
    Ok(())
}

fn cmd_clear(id: u32) -> Result<(), Box<dyn Error>> {
    let mut store = FileStorage::open_default();
    ProgressStore::new().clear(&mut store, id)?;
    println!("Cleared the completion record for puzzle {}.", id);
    Ok(())
}

fn stars_string(stars: u32) -> String {
    "★".repeat(stars.min(3) as usize)
}

fn play(task: Task) -> Result<(), Box<dyn Error>> {
    let mut app = App::new(task, FileStorage::open_default())?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, Hide)?;

    let result = run_app(&mut stdout, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout, LeaveAlternateScreen, Show)?;
    result?;

    let record = app.session().progress();
    if record.game_completed {
        println!(
            "Puzzle {}: {} {}",
            record.id,
            record.time,
            stars_string(record.stars)
        );
    }
    Ok(())
}

fn run_app(stdout: &mut io::Stdout, app: &mut App) -> io::Result<()> {
    loop {
        render::render(stdout, app)?;

        if event::poll(Duration::from_millis(200))? {
            if let Event::Key(key) = event::read()? {
                // Handle Ctrl+C
                if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                    break;
                }
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match app.handle_key(key) {
                    AppAction::Continue => {}
                    AppAction::Quit => break,
                }
            }
        }
    }
    Ok(())
}
