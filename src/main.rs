use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use gardenmap::editor::stage_upload;
use gardenmap::{
    init_logging, Config, EditorSession, JsonFileStorage, LocalUploadService, PieceId,
    UploadService, BUILD_DATE, VERSION,
};

/// Screen size assumed when framing the map without a window.
const HEADLESS_WIDTH: f64 = 1200.0;
const HEADLESS_HEIGHT: f64 = 800.0;

#[derive(Parser)]
#[command(
    name = "gardenmap",
    version,
    about = "Map-piece editor for the merge garden world map"
)]
struct Cli {
    /// Configuration file (JSON or TOML); defaults to the platform config dir
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize the saved map
    Info,
    /// Upload images and place each one at its best-matching edge
    Import {
        #[arg(required = true)]
        images: Vec<PathBuf>,
    },
    /// Record adjacency between touching pieces and save
    Connect,
    /// List uploaded images
    Gallery,
    /// Delete a piece by id
    Remove { id: String },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => Config::default_path()?,
    };
    Config::load_or_default(&path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))
}

fn open_session(config: &Config) -> anyhow::Result<EditorSession> {
    let storage = JsonFileStorage::new(config.storage.resolved_data_dir());
    EditorSession::open(config, Box::new(storage), HEADLESS_WIDTH, HEADLESS_HEIGHT)
        .context("failed to open map")
}

fn upload_service(config: &Config) -> LocalUploadService {
    LocalUploadService::new(
        config.storage.resolved_upload_dir(),
        config.storage.public_prefix.clone(),
    )
}

fn print_info(session: &EditorSession) {
    let store = session.store();
    println!(
        "Map '{}' (gardenmap {} built {})",
        session.namespace(),
        VERSION,
        BUILD_DATE
    );
    println!(
        "{} pieces, {} connections, bounds {}",
        store.len(),
        store.connection_count(),
        store.bounds()
    );
    println!(
        "snapping {}, connections {}",
        if store.snap_enabled() { "on" } else { "off" },
        if store.show_connections() { "shown" } else { "hidden" }
    );
    for piece in store.draw_order() {
        println!(
            "  {}  {:<20} at {} size {:.0}x{:.0} z={}{} links={}",
            piece.id,
            piece.name,
            piece.position(),
            piece.width,
            piece.height,
            piece.z_index,
            if piece.locked { " locked" } else { "" },
            piece.connections.len()
        );
    }
}

async fn import(
    session: &mut EditorSession,
    uploads: &LocalUploadService,
    images: &[PathBuf],
) -> anyhow::Result<()> {
    for path in images {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("not a file path: {}", path.display()))?;
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;

        let pending = stage_upload(uploads, file_name, bytes, session.settings())
            .await
            .with_context(|| format!("failed to stage {}", path.display()))?;
        let pending_id = pending.id;
        session.add_pending(pending);
        let best = session.suggestions_for(pending_id).first().copied();

        let placed = match best {
            Some(suggestion) => {
                println!(
                    "{}: {} edge against {} {} (score {:.1})",
                    file_name,
                    suggestion.source_edge,
                    suggestion.target_id,
                    suggestion.target_edge,
                    suggestion.score
                );
                session.accept_suggestion(pending_id, &suggestion)
            }
            None => session.place_pending_best(pending_id),
        };
        match placed.and_then(|id| session.store().get(id)) {
            Some(piece) => {
                println!("{}: placed as {} at {}", file_name, piece.id, piece.position())
            }
            None => bail!("{}: could not be placed", file_name),
        }
    }
    session.save().context("failed to save map")?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging()?;

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Info => {
            let session = open_session(&config)?;
            print_info(&session);
        }
        Commands::Import { images } => {
            let mut session = open_session(&config)?;
            let uploads = upload_service(&config);
            import(&mut session, &uploads, &images).await?;
        }
        Commands::Connect => {
            let mut session = open_session(&config)?;
            let written = session.auto_connect();
            session.save().context("failed to save map")?;
            println!(
                "{} new links, {} connections total",
                written,
                session.store().connection_count()
            );
        }
        Commands::Gallery => {
            let uploads = upload_service(&config);
            for name in uploads.list().await? {
                println!("{}", uploads.public_path(&name));
            }
        }
        Commands::Remove { id } => {
            let id: PieceId = id
                .parse()
                .with_context(|| format!("invalid piece id: {}", id))?;
            let mut session = open_session(&config)?;
            let Some(removed) = session.store_mut().remove(id) else {
                bail!("no piece with id {}", id);
            };
            session.save().context("failed to save map")?;
            println!("removed '{}'", removed.name);
        }
    }

    Ok(())
}
