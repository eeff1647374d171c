// Filesystem source - reads dashboard artifacts from the configured directory
use crate::application::dashboard_source::{
    content_type_for, is_image_artifact, AssetBytes, DashboardSource, ImageAsset, Loaded,
    SourceError,
};
use crate::domain::table::Table;
use async_trait::async_trait;
use bytes::Bytes;
use std::io::ErrorKind;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct FileSource {
    base_dir: PathBuf,
}

impl FileSource {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    async fn metadata(&self, file: &str) -> Result<std::fs::Metadata, SourceError> {
        let metadata = tokio::fs::metadata(self.base_dir.join(file))
            .await
            .map_err(|e| io_error(file, e))?;

        if !metadata.is_file() {
            return Err(SourceError::Missing {
                file: file.to_string(),
            });
        }
        Ok(metadata)
    }

    async fn read(&self, file: &str) -> Result<(Vec<u8>, std::fs::Metadata), SourceError> {
        let metadata = self.metadata(file).await?;
        let bytes = tokio::fs::read(self.base_dir.join(file))
            .await
            .map_err(|e| io_error(file, e))?;
        Ok((bytes, metadata))
    }
}

fn io_error(file: &str, source: std::io::Error) -> SourceError {
    match source.kind() {
        ErrorKind::NotFound => SourceError::Missing {
            file: file.to_string(),
        },
        _ => SourceError::Io {
            file: file.to_string(),
            source,
        },
    }
}

#[async_trait]
impl DashboardSource for FileSource {
    async fn load_table(&self, file: &str) -> Result<Loaded<Table>, SourceError> {
        let (bytes, metadata) = self.read(file).await?;
        let table = parse_csv(file, &bytes)?;

        tracing::debug!(
            file,
            rows = table.len(),
            columns = table.columns.len(),
            "Loaded table"
        );
        Ok(Loaded::new(file, table, metadata.modified().ok()))
    }

    async fn locate_image(&self, file: &str) -> Result<Loaded<ImageAsset>, SourceError> {
        let metadata = self.metadata(file).await?;
        let asset = ImageAsset {
            content_type: content_type_for(file),
            size: metadata.len(),
        };
        Ok(Loaded::new(file, asset, metadata.modified().ok()))
    }

    async fn read_asset(&self, file: &str) -> Result<Loaded<AssetBytes>, SourceError> {
        if !is_image_artifact(file) {
            return Err(SourceError::NotAllowed {
                file: file.to_string(),
            });
        }

        let (bytes, metadata) = self.read(file).await?;
        let asset = AssetBytes {
            content_type: content_type_for(file),
            bytes: Bytes::from(bytes),
        };
        Ok(Loaded::new(file, asset, metadata.modified().ok()))
    }
}

/// Parse CSV with a header row. Short rows are padded with empty cells;
/// rows longer than the header, empty input and invalid UTF-8 are corrupt.
pub fn parse_csv(file: &str, bytes: &[u8]) -> Result<Table, SourceError> {
    let corrupt = |reason: String| SourceError::Corrupt {
        file: file.to_string(),
        reason,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| corrupt(e.to_string()))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    if columns.is_empty() || columns.iter().all(String::is_empty) {
        return Err(corrupt("no columns to parse".to_string()));
    }

    let width = columns.len();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| corrupt(e.to_string()))?;
        if record.len() > width {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            return Err(corrupt(format!(
                "expected {} fields in line {}, saw {}",
                width,
                line,
                record.len()
            )));
        }

        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        row.resize(width, String::new());
        rows.push(row);
    }

    Ok(Table::new(columns, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashboard_source::{RFM_SEGMENTS, SALES_DATA};
    use tempfile::TempDir;

    fn data_dir(files: &[(&str, &[u8])]) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, contents) in files {
            std::fs::write(dir.path().join(name), contents).unwrap();
        }
        dir
    }

    #[test]
    fn test_parse_csv_pads_short_rows() {
        let table = parse_csv("t.csv", b"a,b,c\n1,2,3\n4,5\n").unwrap();
        assert_eq!(table.columns, vec!["a", "b", "c"]);
        assert_eq!(table.rows[1], vec!["4", "5", ""]);
    }

    #[test]
    fn test_parse_csv_handles_quotes_and_bom() {
        let table = parse_csv("t.csv", "\u{feff}name,region\n\"Smith, J\",North\n".as_bytes()).unwrap();
        assert_eq!(table.columns, vec!["name", "region"]);
        assert_eq!(table.rows[0][0], "Smith, J");
    }

    #[test]
    fn test_parse_csv_rejects_long_rows() {
        let err = parse_csv("t.csv", b"a,b\n1,2,3\n").unwrap_err();
        assert!(matches!(err, SourceError::Corrupt { ref file, .. } if file == "t.csv"));
        assert!(err.to_string().contains("expected 2 fields"));
    }

    #[test]
    fn test_parse_csv_rejects_empty_input() {
        assert!(matches!(
            parse_csv("t.csv", b"").unwrap_err(),
            SourceError::Corrupt { .. }
        ));
    }

    #[test]
    fn test_parse_csv_rejects_invalid_utf8() {
        assert!(matches!(
            parse_csv("t.csv", b"a,b\n\xff\xfe,1\n").unwrap_err(),
            SourceError::Corrupt { .. }
        ));
    }

    #[tokio::test]
    async fn test_load_table() {
        let dir = data_dir(&[(SALES_DATA, b"quantity,unit_price,region\n2,10,North\n".as_slice())]);
        let source = FileSource::new(dir.path());

        let loaded = source.load_table(SALES_DATA).await.unwrap();
        assert_eq!(loaded.file, SALES_DATA);
        assert_eq!(loaded.value.len(), 1);
        assert!(loaded.modified.is_some());
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = data_dir(&[]);
        let source = FileSource::new(dir.path());

        assert!(source.load_table(SALES_DATA).await.unwrap_err().is_missing());
        assert!(source.locate_image(RFM_SEGMENTS).await.unwrap_err().is_missing());
    }

    #[tokio::test]
    async fn test_directory_is_not_a_file() {
        let dir = data_dir(&[]);
        std::fs::create_dir(dir.path().join(SALES_DATA)).unwrap();
        let source = FileSource::new(dir.path());

        assert!(source.load_table(SALES_DATA).await.unwrap_err().is_missing());
    }

    #[tokio::test]
    async fn test_read_asset() {
        let png = [0x89u8, b'P', b'N', b'G'];
        let dir = data_dir(&[(RFM_SEGMENTS, png.as_slice()), ("notes.csv", b"a\n1\n".as_slice())]);
        let source = FileSource::new(dir.path());

        let asset = source.read_asset(RFM_SEGMENTS).await.unwrap();
        assert_eq!(asset.value.content_type, "image/png");
        assert_eq!(asset.value.bytes.as_ref(), &png);

        let located = source.locate_image(RFM_SEGMENTS).await.unwrap();
        assert_eq!(located.value.size, 4);

        assert!(matches!(
            source.read_asset("notes.csv").await.unwrap_err(),
            SourceError::NotAllowed { .. }
        ));
        assert!(matches!(
            source.read_asset("../etc/passwd").await.unwrap_err(),
            SourceError::NotAllowed { .. }
        ));
    }
}
