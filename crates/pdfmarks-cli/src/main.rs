mod cli;
mod export_cmd;
mod import_cmd;
mod shared;

use clap::Parser;
use cli::Cli;

fn main() {
    let cli = Cli::parse();
    shared::init_logging(cli.verbose);

    let result = match cli.command {
        cli::Commands::Export {
            ref file,
            ref output,
            ref bookmarks,
            ref options,
        } => export_cmd::run(file, output.as_deref().or(bookmarks.as_deref()), options),
        cli::Commands::DumpData {
            ref file,
            ref output,
            ref options,
        } => export_cmd::run(file, output.as_deref(), options),
        cli::Commands::Import {
            ref file,
            ref output,
            ref bookmarks,
            ref password,
        } => import_cmd::run(file, bookmarks.as_deref(), output, password.as_deref()),
        cli::Commands::UpdateInfo {
            ref file,
            ref bookmarks,
            ref output,
            ref password,
        } => import_cmd::run(file, Some(bookmarks.as_path()), output, password.as_deref()),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}
