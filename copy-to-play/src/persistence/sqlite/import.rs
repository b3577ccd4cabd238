use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use puzzle::PuzzleId;
use serde_json::Value;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::info;

use crate::persistence::PersistenceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub documents: u64,
}

#[derive(Debug)]
struct ParsedDocument {
    line: usize,
    id: PuzzleId,
    doc: Value,
}

/// Load a newline-delimited JSON export into the build collection.
///
/// Documents are upserted by `_id` in one transaction; the first bad line
/// aborts the whole import. Integer and string ids share one key space, so
/// an `_id` that collides with an id of the other JSON type (in the file or
/// already stored) is rejected rather than replacing the other document.
pub async fn import_build_documents(
    pool: &SqlitePool,
    path: &Path,
) -> Result<ImportReport, PersistenceError> {
    info!(path = %path.display(), "Starting build collection import");

    let file = std::fs::File::open(path)?;
    let documents = parse_documents(std::io::BufReader::new(file))?;

    let mut tx = pool.begin().await?;
    insert_documents(&mut tx, &documents).await?;
    tx.commit().await?;

    let report = ImportReport {
        documents: documents.len() as u64,
    };
    info!(documents = report.documents, "Build collection import completed");
    Ok(report)
}

fn parse_documents(reader: impl BufRead) -> Result<Vec<ParsedDocument>, PersistenceError> {
    let mut documents = Vec::new();
    let mut seen: HashMap<PuzzleId, usize> = HashMap::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let number = index + 1;
        if line.trim().is_empty() {
            continue;
        }

        let invalid = |reason: String| PersistenceError::InvalidDocument {
            line: number,
            reason,
        };

        let doc: Value = serde_json::from_str(&line).map_err(|e| invalid(e.to_string()))?;
        if !doc.is_object() {
            return Err(invalid("expected a JSON object".to_string()));
        }
        let raw_id = doc
            .get("_id")
            .cloned()
            .ok_or_else(|| invalid("missing _id".to_string()))?;
        let id: PuzzleId =
            serde_json::from_value(raw_id).map_err(|e| invalid(format!("bad _id: {e}")))?;

        if let Some(first) = seen.insert(id.clone(), number) {
            return Err(invalid(format!("_id {id} already used on line {first}")));
        }

        documents.push(ParsedDocument {
            line: number,
            id,
            doc,
        });
    }

    Ok(documents)
}

/// SQLite `json_type` name for an `_id` value.
fn id_type(raw_id: &Value) -> &'static str {
    match raw_id {
        Value::String(_) => "text",
        Value::Number(n) if n.is_f64() => "real",
        Value::Number(_) => "integer",
        _ => "other",
    }
}

async fn insert_documents(
    tx: &mut Transaction<'_, Sqlite>,
    documents: &[ParsedDocument],
) -> Result<(), PersistenceError> {
    for parsed in documents {
        let stored: Option<(Option<String>,)> =
            sqlx::query_as("SELECT json_type(doc, '$._id') FROM puzzle2 WHERE id = ?")
                .bind(parsed.id.as_str())
                .fetch_optional(&mut **tx)
                .await?;

        let incoming = id_type(&parsed.doc["_id"]);
        if let Some((Some(existing),)) = stored {
            if existing != incoming {
                return Err(PersistenceError::InvalidDocument {
                    line: parsed.line,
                    reason: format!(
                        "_id {} is stored as {existing}, this document has {incoming}",
                        parsed.id
                    ),
                });
            }
        }

        sqlx::query("INSERT OR REPLACE INTO puzzle2 (id, doc) VALUES (?, ?)")
            .bind(parsed.id.as_str())
            .bind(serde_json::to_string(&parsed.doc)?)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::sqlite::{Database, SqliteSourceRepository};
    use crate::persistence::traits::SourceRepository;
    use std::io::Write;

    fn write_export(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        file
    }

    #[tokio::test]
    async fn test_import_loads_documents() {
        let db = Database::new_in_memory().await.unwrap();
        let export = write_export(&[
            r#"{"_id":"uf4XN","gameId":"g1","fen":"F1","moves":["a5e1","g3g7"],"generator":"genA"}"#,
            "",
            r#"{"_id":7,"gameId":"g2","fen":"F2","moves":["d4"],"generator":"genB","review":{"approved":false}}"#,
        ]);

        let report = import_build_documents(db.pool(), export.path()).await.unwrap();
        assert_eq!(report.documents, 2);

        let repo = SqliteSourceRepository::new(db.pool().clone());
        assert_eq!(repo.count().await.unwrap(), 2);
        let page = repo.eligible_page(None, 10).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id().as_str(), "uf4XN");
    }

    #[tokio::test]
    async fn test_import_reports_bad_line_and_writes_nothing() {
        let db = Database::new_in_memory().await.unwrap();
        let export = write_export(&[
            r#"{"_id":"a","gameId":"g1","fen":"F1","moves":["e4","e5"],"generator":"genA"}"#,
            r#"{"gameId":"g2"}"#,
        ]);

        let err = import_build_documents(db.pool(), export.path())
            .await
            .unwrap_err();
        assert!(matches!(err, PersistenceError::InvalidDocument { line: 2, .. }));

        let repo = SqliteSourceRepository::new(db.pool().clone());
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[test]
    fn test_parse_rejects_non_objects() {
        let err = parse_documents("[1, 2]\n".as_bytes()).unwrap_err();
        assert!(matches!(err, PersistenceError::InvalidDocument { line: 1, .. }));

        let err = parse_documents("not json\n".as_bytes()).unwrap_err();
        assert!(matches!(err, PersistenceError::InvalidDocument { line: 1, .. }));
    }

    #[test]
    fn test_parse_accepts_numeric_ids() {
        let docs = parse_documents(r#"{"_id": 12}"#.as_bytes()).unwrap();
        assert_eq!(docs[0].id.as_str(), "12");
        assert_eq!(docs[0].line, 1);
    }

    #[test]
    fn test_parse_rejects_integer_and_string_id_collision() {
        let input = "{\"_id\": 1}\n{\"_id\": \"1\"}\n";
        let err = parse_documents(input.as_bytes()).unwrap_err();
        assert!(matches!(err, PersistenceError::InvalidDocument { line: 2, .. }));
    }

    #[tokio::test]
    async fn test_import_rejects_id_stored_with_other_type() {
        let db = Database::new_in_memory().await.unwrap();
        let first = write_export(&[
            r#"{"_id":"1","gameId":"g1","fen":"F1","moves":["e4","e5"],"generator":"genA"}"#,
        ]);
        import_build_documents(db.pool(), first.path()).await.unwrap();

        let second = write_export(&[
            r#"{"_id":"2","gameId":"g2","fen":"F2","moves":["d4","d5"],"generator":"genA"}"#,
            r#"{"_id":1,"gameId":"other","fen":"F9","moves":["c4","c5"],"generator":"genB"}"#,
        ]);
        let err = import_build_documents(db.pool(), second.path())
            .await
            .unwrap_err();
        assert!(matches!(err, PersistenceError::InvalidDocument { line: 2, .. }));

        let repo = SqliteSourceRepository::new(db.pool().clone());
        assert_eq!(repo.count().await.unwrap(), 1);
        let page = repo.eligible_page(None, 10).await.unwrap();
        assert!(matches!(&page[0], crate::persistence::SourceEntry::Puzzle(p) if p.game_id == "g1"));
    }

    #[tokio::test]
    async fn test_reimport_same_id_type_replaces() {
        let db = Database::new_in_memory().await.unwrap();
        let first = write_export(&[r#"{"_id":5,"gameId":"old","fen":"F","moves":["e4","e5"],"generator":"g"}"#]);
        let second = write_export(&[r#"{"_id":5,"gameId":"new","fen":"F","moves":["e4","e5"],"generator":"g"}"#]);
        import_build_documents(db.pool(), first.path()).await.unwrap();
        import_build_documents(db.pool(), second.path()).await.unwrap();

        let repo = SqliteSourceRepository::new(db.pool().clone());
        let page = repo.eligible_page(None, 10).await.unwrap();
        assert_eq!(page.len(), 1);
        assert!(matches!(&page[0], crate::persistence::SourceEntry::Puzzle(p) if p.game_id == "new"));
    }
}
