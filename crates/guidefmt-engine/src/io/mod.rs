use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::models::{Document, DocumentError, DocumentSet};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{path}: {source}")]
    Document {
        path: PathBuf,
        source: DocumentError,
    },
}

/// Read one guide source file into a [`Document`].
///
/// The document takes its name from the file name, with a `.gde` suffix
/// stripped by the parser.
pub fn read_document(path: &Path) -> Result<Document, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path).map_err(IoError::Io)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Document::parse(&name, content.lines()).map_err(|source| IoError::Document {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a list of guide files into a set, in the order given.
pub fn load_set(paths: &[PathBuf]) -> Result<DocumentSet, IoError> {
    let mut set = DocumentSet::new();
    for path in paths {
        set.add_document(read_document(path)?);
    }
    Ok(set)
}

/// Write formatted documents into a directory, one `NAME.gde` file each.
pub fn write_documents(
    output_dir: &Path,
    outputs: &[(String, Vec<String>)],
) -> Result<(), IoError> {
    fs::create_dir_all(output_dir).map_err(IoError::Io)?;

    for (name, lines) in outputs {
        let path = output_dir.join(format!("{name}.gde"));
        info!("writing: {}", path.display());
        let mut content = lines.join("\n");
        content.push('\n');
        fs::write(&path, content).map_err(IoError::Io)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write as _;
    use tempfile::TempDir;

    fn write_guide(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn read_document_names_after_the_file() {
        let dir = TempDir::new().unwrap();
        let path = write_guide(&dir, "manual.gde", "@node Main\nbody\n");
        let doc = read_document(&path).unwrap();
        assert_eq!(doc.name(), "manual");
        assert_eq!(doc.nodes().len(), 1);
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = read_document(Path::new("/nonexistent/guide.gde")).unwrap_err();
        assert!(matches!(err, IoError::NotFound(_)));
    }

    #[test]
    fn structural_errors_carry_the_path() {
        let dir = TempDir::new().unwrap();
        let path = write_guide(&dir, "bad.gde", "@prev Nowhere\n");
        let err = read_document(&path).unwrap_err();
        assert!(matches!(err, IoError::Document { .. }));
        assert!(err.to_string().contains("bad.gde"));
    }

    #[test]
    fn load_set_keeps_file_order() {
        let dir = TempDir::new().unwrap();
        let a = write_guide(&dir, "a.gde", "@node A\n");
        let b = write_guide(&dir, "b.gde", "@node B\n");
        let set = load_set(&[a, b]).unwrap();
        let names: Vec<&str> = set.documents().iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn write_documents_emits_one_file_per_document() {
        let dir = TempDir::new().unwrap();
        let out_dir = dir.path().join("out");
        write_documents(
            &out_dir,
            &[("manual".to_string(), vec!["@node Main".to_string()])],
        )
        .unwrap();

        let written = fs::read_to_string(out_dir.join("manual.gde")).unwrap();
        assert_eq!(written, "@node Main\n");
    }
}
