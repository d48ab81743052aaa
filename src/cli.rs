use crate::config::{LayoutConfig, load_config};
use crate::document::{load_tree, save_tree};
use crate::editor;
use crate::ir::{Graph, Person};
use crate::layout::reset_layout;
use crate::path::find_path;
use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "ftree", version, about = "Family tree editor with generation-aware layout")]
pub struct Args {
    /// Tree document (JSON)
    #[arg(short = 't', long = "tree")]
    pub tree: PathBuf,

    /// Layout config file (JSON or JSON5)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Args, Debug, Clone)]
pub struct PersonArgs {
    /// Display name
    #[arg(long)]
    pub name: String,

    /// Birth year or date, free-form
    #[arg(long, default_value = "")]
    pub birth: String,

    /// Death year or date, free-form
    #[arg(long, default_value = "")]
    pub death: String,

    /// Photo file, stored as-is
    #[arg(long)]
    pub photo: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create an empty tree document
    Init,
    /// Add a person with no parents
    AddRoot(PersonArgs),
    /// Add a child below a person
    AddChild {
        #[arg(long)]
        parent: String,
        #[command(flatten)]
        person: PersonArgs,
    },
    /// Add a sibling sharing a person's parents
    AddSibling {
        #[arg(long)]
        sibling: String,
        #[command(flatten)]
        person: PersonArgs,
    },
    /// Add a spouse to a person
    AddSpouse {
        #[arg(long)]
        partner: String,
        #[command(flatten)]
        person: PersonArgs,
    },
    /// Add an unrelated person on the same generation, pinned in place
    AddPeer {
        #[arg(long)]
        reference: String,
        #[command(flatten)]
        person: PersonArgs,
    },
    /// Change a person's name, dates or photo
    Edit {
        #[arg(long)]
        id: String,
        #[command(flatten)]
        person: PersonArgs,
    },
    /// Set a node's coordinates by hand and pin it
    Move {
        #[arg(long)]
        id: String,
        #[arg(long, allow_negative_numbers = true)]
        x: f64,
        #[arg(long, allow_negative_numbers = true)]
        y: f64,
    },
    /// Delete a node and its relationships
    Delete {
        #[arg(long)]
        id: String,
    },
    /// Unpin everything and recompute the whole layout
    ResetLayout,
    /// Print the relationship path from the root to a node
    Path {
        #[arg(long)]
        target: String,
    },
    /// List every person with generation and position
    List,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    crate::logging::init_tracing();
    let config = load_config(args.config.as_deref())?;

    if matches!(args.command, Command::Init) {
        if args.tree.exists() {
            bail!("{} already exists", args.tree.display());
        }
        save_tree(&args.tree, &Graph::new())?;
        return Ok(());
    }

    let mut graph = load_tree(&args.tree)
        .with_context(|| format!("failed to load {}", args.tree.display()))?;
    let stdout = io::stdout();
    let modified = execute(&mut graph, args.command, &config, &mut stdout.lock())?;
    if modified {
        save_tree(&args.tree, &graph)
            .with_context(|| format!("failed to save {}", args.tree.display()))?;
    }
    Ok(())
}

/// Applies one command to a loaded tree. Returns whether the tree must be saved.
pub fn execute(
    graph: &mut Graph,
    command: Command,
    config: &LayoutConfig,
    out: &mut impl Write,
) -> Result<bool> {
    let placement = &config.placement;
    match command {
        Command::Init => bail!("init only applies to a new tree file"),
        Command::AddRoot(person) => {
            let id = editor::add_root(graph, read_person(person)?, placement);
            writeln!(out, "{id}")?;
        }
        Command::AddChild { parent, person } => {
            let id = editor::add_child(graph, &parent, read_person(person)?, placement)
                .ok_or_else(|| missing(&parent))?;
            writeln!(out, "{id}")?;
        }
        Command::AddSibling { sibling, person } => {
            let id = editor::add_sibling(graph, &sibling, read_person(person)?, placement)
                .ok_or_else(|| missing(&sibling))?;
            writeln!(out, "{id}")?;
        }
        Command::AddSpouse { partner, person } => {
            let id = editor::add_spouse(graph, &partner, read_person(person)?, placement)
                .ok_or_else(|| missing(&partner))?;
            writeln!(out, "{id}")?;
        }
        Command::AddPeer { reference, person } => {
            let id = editor::add_peer(graph, &reference, read_person(person)?, placement)
                .ok_or_else(|| missing(&reference))?;
            writeln!(out, "{id}")?;
        }
        Command::Edit { id, person } => {
            if !editor::edit_person(graph, &id, read_person(person)?) {
                return Err(missing(&id));
            }
        }
        Command::Move { id, x, y } => {
            if !x.is_finite() || !y.is_finite() {
                bail!("coordinates must be finite numbers, got ({x}, {y})");
            }
            if !editor::move_node(graph, &id, x, y) {
                return Err(missing(&id));
            }
        }
        Command::Delete { id } => {
            if !editor::delete_node(graph, &id) {
                return Err(missing(&id));
            }
        }
        Command::ResetLayout => {
            let report = reset_layout(graph, config);
            if !report.converged {
                writeln!(
                    out,
                    "warning: generations did not settle after {} passes",
                    report.passes
                )?;
            }
        }
        Command::Path { target } => {
            for (from, to) in find_path(graph, &target).iter().step_by(2) {
                writeln!(out, "{from} -> {to}")?;
            }
            return Ok(false);
        }
        Command::List => {
            for node in graph.persons() {
                let Some(person) = node.as_person() else {
                    continue;
                };
                let lifespan = person.lifespan();
                let label = if lifespan.is_empty() {
                    person.name.clone()
                } else {
                    format!("{} ({lifespan})", person.name)
                };
                writeln!(
                    out,
                    "{}\tgen {}\t({}, {}){}\t{label}",
                    node.id,
                    node.level,
                    node.x,
                    node.y,
                    if node.pinned { " pinned" } else { "" }
                )?;
            }
            return Ok(false);
        }
    }
    Ok(true)
}

fn read_person(args: PersonArgs) -> Result<Person> {
    let photo = args.photo.as_deref().map(read_photo).transpose()?;
    Ok(Person {
        name: args.name,
        birth_date: args.birth,
        death_date: args.death,
        photo,
    })
}

fn read_photo(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("failed to read photo {}", path.display()))
}

fn missing(id: &str) -> anyhow::Error {
    anyhow!("no node with id `{id}`")
}
