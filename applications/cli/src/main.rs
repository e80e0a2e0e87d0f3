/// Setlist - ordered playlist store
use clap::{Parser, Subcommand};
use serde::Serialize;
use setlist_cli::{App, CliConfig};
use setlist_core::{Outcome, Playlist, ViewRow};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "setlist")]
#[command(about = "Ordered playlist store", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "SETLIST_CONFIG")]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new playlist
    CreatePlaylist { name: String },
    /// List all playlists
    Playlists,
    /// Reject structural changes to a playlist
    Lock {
        /// Playlist id or name
        playlist: String,
    },
    /// Accept structural changes to a playlist again
    Unlock { playlist: String },
    /// Add a file to the library
    AddTrack { path: String },
    /// Soft-delete a library track
    DeleteTrack { id: i64 },
    /// Show a playlist in order
    List { playlist: String },
    /// Insert tracks as one block at a position (0 appends)
    Insert {
        playlist: String,
        position: i64,
        /// File paths or `#<track id>`
        #[arg(required = true)]
        tracks: Vec<String>,
    },
    /// Append a track
    Append {
        playlist: String,
        track: String,
    },
    /// Move the entry at OLD to NEW (0 moves to the end)
    Move {
        playlist: String,
        #[arg(allow_negative_numbers = true)]
        old: i64,
        #[arg(allow_negative_numbers = true)]
        new: i64,
    },
    /// Remove the entries at the given positions
    Remove {
        playlist: String,
        #[arg(required = true, allow_negative_numbers = true)]
        positions: Vec<i64>,
    },
    /// Shuffle the playlist from a position to the end
    Shuffle {
        playlist: String,
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        from: i64,
    },
    /// Filter a playlist by title, artist, album or location
    Search {
        playlist: String,
        text: String,
    },
    /// Show what can be done with a playlist
    Capabilities { playlist: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "setlist_cli=info,setlist_storage=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = CliConfig::load(cli.config.as_deref())?;
    config.validate()?;
    tracing::debug!(database_url = %config.storage.database_url, "loaded configuration");

    let app = App::open(&config).await?;
    let json = cli.json;

    match cli.command {
        Commands::CreatePlaylist { name } => {
            let playlist = app.create_playlist(&name).await?;
            emit(json, &playlist, || print_playlists(std::slice::from_ref(&playlist)))?;
        }
        Commands::Playlists => {
            let all = app.playlists().await?;
            emit(json, &all, || print_playlists(&all))?;
        }
        Commands::Lock { playlist } => {
            let id = app.set_locked(&playlist, true).await?;
            emit(json, &id, || println!("Locked playlist {}", id))?;
        }
        Commands::Unlock { playlist } => {
            let id = app.set_locked(&playlist, false).await?;
            emit(json, &id, || println!("Unlocked playlist {}", id))?;
        }
        Commands::AddTrack { path } => {
            let track = app.add_track(&path).await?;
            emit(json, &track, || println!("#{}  {}", track.id, track.location))?;
        }
        Commands::DeleteTrack { id } => {
            app.delete_track(id).await?;
            emit(json, &id, || println!("Deleted track #{}", id))?;
        }
        Commands::List { playlist } => {
            let rows = app.list(&playlist).await?;
            emit(json, &rows, || print_rows(&rows))?;
        }
        Commands::Insert {
            playlist,
            position,
            tracks,
        } => {
            let outcome = app.insert(&playlist, position, &tracks).await?;
            emit(json, &outcome, || {
                print_outcome(&outcome, |n| format!("Inserted {} track(s)", n));
            })?;
        }
        Commands::Append { playlist, track } => {
            let outcome = app.append(&playlist, &track).await?;
            emit(json, &outcome, || {
                print_outcome(&outcome, |p| format!("Appended at position {}", p));
            })?;
        }
        Commands::Move { playlist, old, new } => {
            let outcome = app.move_track(&playlist, old, new).await?;
            emit(json, &outcome, || {
                print_outcome(&outcome, |()| format!("Moved {} -> {}", old, new));
            })?;
        }
        Commands::Remove {
            playlist,
            positions,
        } => {
            let outcome = app.remove(&playlist, &positions).await?;
            emit(json, &outcome, || {
                print_outcome(&outcome, |n| format!("Removed {} track(s)", n));
            })?;
        }
        Commands::Shuffle { playlist, from } => {
            let outcome = app.shuffle(&playlist, from).await?;
            emit(json, &outcome, || {
                print_outcome(&outcome, |()| format!("Shuffled from position {}", from));
            })?;
        }
        Commands::Search { playlist, text } => {
            let rows = app.search(&playlist, &text).await?;
            emit(json, &rows, || print_rows(&rows))?;
        }
        Commands::Capabilities { playlist } => {
            let caps = app.capabilities(&playlist).await?;
            emit(json, &caps, || {
                for cap in &caps {
                    println!("{:?}", cap);
                }
            })?;
        }
    }

    Ok(())
}

/// Print `value` as JSON, or run the human-readable printer
fn emit<T: Serialize>(json: bool, value: &T, human: impl FnOnce()) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        human();
    }
    Ok(())
}

fn print_playlists(playlists: &[Playlist]) {
    for playlist in playlists {
        let lock = if playlist.locked { " (locked)" } else { "" };
        println!("{:>4}  {}{}", playlist.id, playlist.name, lock);
    }
}

fn print_rows(rows: &[ViewRow]) {
    for row in rows {
        let artist = row.artist.as_deref().unwrap_or("-");
        println!("{:>4}  {}  {}  #{}", row.position, artist, row.title, row.track_id);
    }
}

fn print_outcome<T: Copy>(outcome: &Outcome<T>, applied: impl FnOnce(T) -> String) {
    match outcome {
        Outcome::Applied(value) => println!("{}", applied(*value)),
        Outcome::Skipped(reason) => println!("Nothing changed: {}", reason),
    }
}
