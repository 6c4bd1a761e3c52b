use std::io::{self, Write};
use std::path::Path;

use pdfmarks::{ExportOptions, write_bookmarks};

use crate::cli::ExportArgs;
use crate::shared::{fail, open_pdf};

pub fn run(file: &Path, output: Option<&Path>, args: &ExportArgs) -> Result<(), i32> {
    let doc = open_pdf(file, args.password.as_deref())?;
    let options = ExportOptions {
        max_depth: args.max_depth,
        strict_mode: args.strict,
        ..ExportOptions::default()
    };

    let result = pdfmarks::export_records::<pdfmarks::LopdfBackend>(doc.document(), &options)
        .map_err(fail)?;
    // A document without an outline exports as empty text.
    let records = result.value.unwrap_or_default();
    tracing::debug!(
        bookmarks = records.len(),
        warnings = result.warnings.len(),
        "exported bookmarks"
    );

    match output {
        Some(path) => {
            let mut buf = Vec::new();
            write_bookmarks(&records, &mut buf).map_err(fail)?;
            std::fs::write(path, buf)
                .map_err(|e| fail(format!("failed to write {}: {e}", path.display())))
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            write_bookmarks(&records, &mut out)
                .and_then(|()| out.flush())
                .map_err(fail)
        }
    }
}
