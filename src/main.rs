use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use treequill::config::Config;
use treequill::editor::mutation;
use treequill::editor::placement::Placement;
use treequill::editor::state::EditorState;
use treequill::file::loader::{load_document_file, load_document_from_stdin};
use treequill::file::saver::{export_document_file, save_document_file};
use treequill::view::rows::TreeRow;

/// TreeQuill - edit nested labeled trees with typed custom fields
#[derive(Parser)]
#[command(name = "treequill")]
#[command(version)]
#[command(about = "Edit nested labeled trees with typed custom fields", long_about = None)]
struct Cli {
    /// Config file to use instead of ~/.config/treequill/config.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the tree
    Show {
        file: PathBuf,
        /// Print every node, ignoring collapsed state
        #[arg(short, long)]
        all: bool,
        /// Print node ids next to names
        #[arg(long)]
        ids: bool,
    },
    /// Search the tree and print the matches
    Search {
        file: PathBuf,
        /// Query, e.g. `type:Employee Department:Sales`
        query: String,
        /// Which result to focus (0-based)
        #[arg(short, long, default_value_t = 0)]
        select: usize,
    },
    /// Add a node
    Add {
        file: PathBuf,
        name: String,
        /// Parent node id (omit to add a root)
        #[arg(short, long)]
        parent: Option<String>,
        /// Node type id
        #[arg(short = 't', long = "type")]
        node_type: Option<String>,
    },
    /// Rename a node
    Rename { file: PathBuf, id: String, name: String },
    /// Delete a node and its subtree
    Delete { file: PathBuf, id: String },
    /// Move a node relative to a target node
    Move {
        file: PathBuf,
        source: String,
        target: String,
        /// before, after or inside
        #[arg(short, long, default_value = "inside")]
        placement: Placement,
    },
    /// Write the document with a version and export date
    Export { file: PathBuf, output: PathBuf },
    /// Validate a document (or stdin with `-`) and save it
    Import { input: PathBuf, file: PathBuf },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };

    match cli.command {
        Command::Show { file, all, ids } => {
            let mut document = load_document_file(&file)?;
            if all {
                document.tree = mutation::expand_all(&document.tree);
            }
            let state = EditorState::new(document);
            print_rows(&state.visible_rows(), ids);
        }
        Command::Search {
            file,
            query,
            select,
        } => {
            let mut state = EditorState::new(load_document_file(&file)?);
            state.set_auto_expand_results(config.auto_expand_results);
            state.set_query(&query);
            if state.results().is_empty() {
                println!("No matches");
                return Ok(());
            }
            state.select_result(select);
            for (index, result) in state.results().iter().enumerate() {
                let marker = if index == state.selected_index() { '>' } else { ' ' };
                println!(
                    "{} {} [{}] {}: {}",
                    marker,
                    result.name,
                    result.node_id,
                    result.match_field,
                    result.match_value
                );
            }
            println!();
            print_rows(&state.visible_rows(), false);
        }
        Command::Add {
            file,
            name,
            parent,
            node_type,
        } => {
            let mut state = EditorState::new(load_document_file(&file)?);
            if let Some(parent) = &parent {
                if !state.forest().contains(parent) {
                    log::warn!("parent {} not found, adding as a root", parent);
                }
            }
            let id = state
                .add_node(&name, parent.as_deref(), node_type.as_deref())
                .context("Generated node id is already in use")?;
            save(&file, &state, &config)?;
            println!("{}", id);
        }
        Command::Rename { file, id, name } => {
            let mut state = EditorState::new(load_document_file(&file)?);
            require_node(&state, &id)?;
            if state.rename_node(&id, &name) {
                save(&file, &state, &config)?;
            }
        }
        Command::Delete { file, id } => {
            let mut state = EditorState::new(load_document_file(&file)?);
            require_node(&state, &id)?;
            state.delete_node(&id);
            save(&file, &state, &config)?;
        }
        Command::Move {
            file,
            source,
            target,
            placement,
        } => {
            let mut state = EditorState::new(load_document_file(&file)?);
            if let Err(rejection) =
                treequill::editor::mutation::check_move(state.forest(), &source, &target)
            {
                bail!("Cannot move {}: {}", source, rejection);
            }
            if state.move_node(&source, &target, placement) {
                save(&file, &state, &config)?;
            }
        }
        Command::Export { file, output } => {
            let document = load_document_file(&file)?;
            export_document_file(&output, &document, &config)?;
        }
        Command::Import { input, file } => {
            let document = if input == Path::new("-") {
                load_document_from_stdin()?
            } else {
                load_document_file(&input)?
            };
            save_document_file(&file, &document, &config)
                .with_context(|| format!("Failed to import into {}", file.display()))?;
        }
    }

    Ok(())
}

fn require_node(state: &EditorState, id: &str) -> Result<()> {
    if !state.forest().contains(id) {
        bail!("No node with id {}", id);
    }
    Ok(())
}

fn save(file: &Path, state: &EditorState, config: &Config) -> Result<()> {
    save_document_file(file, &state.to_document(), config)
        .with_context(|| format!("Failed to save {}", file.display()))
}

fn print_rows(rows: &[TreeRow], show_ids: bool) {
    for row in rows {
        let marker = match (row.has_children, row.expanded) {
            (false, _) => ' ',
            (true, true) => '-',
            (true, false) => '+',
        };
        let icon = row
            .icon
            .as_ref()
            .filter(|icon| icon.is_glyph())
            .map(|icon| format!("{} ", icon.as_str()))
            .unwrap_or_default();
        let highlight = if row.selected {
            " <"
        } else if row.highlighted {
            " *"
        } else {
            ""
        };
        let id = if show_ids {
            format!(" ({})", row.id)
        } else {
            String::new()
        };
        println!(
            "{}{} {}{}{}{}",
            "  ".repeat(row.depth),
            marker,
            icon,
            row.name,
            id,
            highlight
        );
    }
}
