use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Dump and update PDF bookmarks as pdftk-compatible text.
#[derive(Debug, Parser)]
#[command(name = "pdfmarks", about, version)]
pub struct Cli {
    /// Increase log output on stderr (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by the export subcommands.
#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Password for encrypted PDFs
    #[arg(long)]
    pub password: Option<String>,

    /// Fail on the first unexportable bookmark instead of warning
    #[arg(long)]
    pub strict: bool,

    /// Skip bookmarks nested deeper than this (default: no limit)
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write the bookmarks of a PDF as text
    Export {
        /// Path to the PDF file
        #[arg(value_name = "PDF")]
        file: PathBuf,

        /// Bookmark text file to write. Default: stdout
        #[arg(value_name = "OUTPUT", conflicts_with = "bookmarks")]
        output: Option<PathBuf>,

        /// Bookmark text file to write (same as OUTPUT)
        #[arg(long, value_name = "FILE")]
        bookmarks: Option<PathBuf>,

        #[command(flatten)]
        options: ExportArgs,
    },

    /// Replace the bookmarks of a PDF and write the result to a new file
    Import {
        /// Path to the PDF file
        #[arg(value_name = "PDF")]
        file: PathBuf,

        /// Path of the PDF to write
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Bookmark text file to read. Default: stdin
        #[arg(long, value_name = "FILE")]
        bookmarks: Option<PathBuf>,

        /// Password for encrypted PDFs
        #[arg(long)]
        password: Option<String>,
    },

    /// pdftk-style alias of `export`
    #[command(name = "dump_data")]
    DumpData {
        /// Path to the PDF file
        #[arg(value_name = "PDF")]
        file: PathBuf,

        /// Bookmark text file to write. Default: stdout
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        options: ExportArgs,
    },

    /// pdftk-style alias of `import`
    #[command(name = "update_info")]
    UpdateInfo {
        /// Path to the PDF file
        #[arg(value_name = "PDF")]
        file: PathBuf,

        /// Bookmark text file to read
        #[arg(value_name = "BOOKMARKS")]
        bookmarks: PathBuf,

        /// Path of the PDF to write
        #[arg(long, value_name = "FILE")]
        output: PathBuf,

        /// Password for encrypted PDFs
        #[arg(long)]
        password: Option<String>,
    },
}
