use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

use recast::diagnostics::{render_error, RefactorError};
use recast::edit::{Edit, EditSet};
use recast::ImportOptions;

#[derive(Parser)]
#[command(
    name = "recast",
    version,
    about = "Source-to-source refactoring for PeopleCode application classes"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rename the symbol at a byte offset across all of its references
    Rename {
        /// Source file path
        file: PathBuf,
        /// Byte offset of the cursor inside the symbol to rename
        #[arg(long)]
        offset: usize,
        /// The new name (a missing '&' sigil is added for variables)
        #[arg(long = "to")]
        new_name: String,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Reconcile the import block against the classes the code actually uses
    Imports {
        /// Source file path
        file: PathBuf,
        /// Sort the final import block alphabetically
        #[arg(long)]
        sort: bool,
        /// Keep wildcards that cover at least one used class instead of
        /// expanding them
        #[arg(long)]
        keep_wildcards: bool,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Reorder method/property implementations to declaration order
    Sort {
        /// Source file path
        file: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(clap::Args)]
struct OutputArgs {
    /// Cursor byte offset to remap through the edits
    #[arg(long, default_value_t = 0)]
    cursor: usize,
    /// Rewrite the file in place instead of printing to stdout
    #[arg(long)]
    write: bool,
    /// Emit the queued edits and remapped cursor as JSON instead of text,
    /// for an editor host that applies edits to its own buffer
    #[arg(long)]
    json: bool,
}

/// The `--json` report an editor host consumes.
#[derive(Serialize)]
struct EditReport<'a> {
    edits: &'a [Edit],
    cursor: usize,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(()) => ExitCode::FAILURE,
    }
}

fn run(cli: Cli) -> Result<(), ()> {
    let (file, output) = match &cli.command {
        Commands::Rename { file, output, .. }
        | Commands::Imports { file, output, .. }
        | Commands::Sort { file, output } => (file.clone(), output),
    };

    let source = std::fs::read_to_string(&file).map_err(|e| {
        eprintln!("error: failed to read {}: {e}", file.display());
    })?;
    let filename = file.display().to_string();

    let edits = queue_edits(&cli.command, &source).map_err(|err| {
        render_error(&source, &filename, &err);
    })?;

    if output.json {
        let queued: Vec<Edit> = edits.edits().to_vec();
        let (_, cursor) = edits
            .apply(&source, output.cursor)
            .map_err(|err| render_error(&source, &filename, &err))?;
        let report = EditReport { edits: &queued, cursor };
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: failed to serialize edits: {e}");
                return Err(());
            }
        }
        return Ok(());
    }

    let (text, cursor) = edits
        .apply(&source, output.cursor)
        .map_err(|err| render_error(&source, &filename, &err))?;

    if output.write {
        std::fs::write(&file, &text).map_err(|e| {
            eprintln!("error: failed to write {}: {e}", file.display());
        })?;
        eprintln!("cursor: {cursor}");
    } else {
        print!("{text}");
        eprintln!("cursor: {cursor}");
    }
    Ok(())
}

fn queue_edits(command: &Commands, source: &str) -> Result<EditSet, RefactorError> {
    match command {
        Commands::Rename { offset, new_name, .. } => {
            recast::rename_edits(source, *offset, new_name)
        }
        Commands::Imports { sort, keep_wildcards, .. } => {
            let options = ImportOptions {
                sort_alphabetically: *sort,
                preserve_wildcards: *keep_wildcards,
            };
            recast::import_edits(source, &options)
        }
        Commands::Sort { .. } => recast::sort_edits(source),
    }
}
