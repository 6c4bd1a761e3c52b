use std::path::Path;

use pdfmarks::{BookmarkError, Bookmarks};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level is `warn`, raised by each
/// `-v`.
pub fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = if verbose > 0 {
        EnvFilter::new(default_level)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

/// Open a PDF file with user-friendly error messages.
///
/// Returns `Err(1)` with a message printed to stderr if the file is not found
/// or cannot be opened.
pub fn open_pdf(file: &Path, password: Option<&str>) -> Result<Bookmarks, i32> {
    if !file.exists() {
        eprintln!("Error: file not found: {}", file.display());
        return Err(1);
    }

    let result = match password {
        Some(pw) => Bookmarks::open_file_with_password(file, pw.as_bytes()),
        None => Bookmarks::open_file(file),
    };
    result.map_err(|e| {
        match e {
            BookmarkError::PasswordRequired => {
                eprintln!("Error: {e} (use --password)");
            }
            _ => eprintln!("Error: failed to open PDF: {e}"),
        }
        1
    })
}

/// Print `err` to stderr and return the failure exit code.
pub fn fail(err: impl std::fmt::Display) -> i32 {
    eprintln!("Error: {err}");
    1
}
