use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use crate::shared::{fail, open_pdf};

/// Read bookmark text from `bookmarks` (or stdin), apply it to `file`, and
/// write the result to `output`. `output` is only created when the import
/// succeeds.
pub fn run(
    file: &Path,
    bookmarks: Option<&Path>,
    output: &Path,
    password: Option<&str>,
) -> Result<(), i32> {
    let mut doc = open_pdf(file, password)?;

    let count = match bookmarks {
        Some(path) => {
            let reader = File::open(path)
                .map(BufReader::new)
                .map_err(|e| fail(format!("failed to read {}: {e}", path.display())))?;
            doc.import_from(reader)
        }
        None => doc.import_from(io::stdin().lock()),
    }
    .map_err(fail)?;

    let bytes = doc.to_bytes().map_err(fail)?;
    std::fs::write(output, bytes)
        .map_err(|e| fail(format!("failed to write {}: {e}", output.display())))?;
    tracing::debug!(count, output = %output.display(), "wrote bookmarks");
    Ok(())
}
