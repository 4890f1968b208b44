//! A schemaless document store on top of SQLite.
//!
//! Records are stored one JSON body per row, keyed by `(collection, id)`.
//! There is deliberately no unique constraint on the key: the upstream data
//! this app was built around can contain duplicated ids, and the menu loader
//! is responsible for detecting and repairing that corruption. [put_document]
//! replaces every row carrying the id, so a put always leaves exactly one
//! copy behind.

use rusqlite::Connection;
use serde_json::Value;

use crate::Error;

/// Initialize the document table and its lookup index.
pub fn create_document_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS document (
            row_id INTEGER PRIMARY KEY,
            collection TEXT NOT NULL,
            id TEXT NOT NULL,
            body TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_document_collection_id
            ON document(collection, id);",
    )?;

    Ok(())
}

/// Retrieve every document in `collection` as `(id, body)` pairs, in
/// insertion order.
///
/// Duplicated ids are returned as-is; callers decide how to reconcile them.
pub fn get_all_documents(
    collection: &str,
    connection: &Connection,
) -> Result<Vec<(String, Value)>, Error> {
    connection
        .prepare("SELECT id, body FROM document WHERE collection = :collection ORDER BY row_id;")?
        .query_map(&[(":collection", &collection)], |row| {
            let id: String = row.get(0)?;
            let body: String = row.get(1)?;

            Ok((id, body))
        })?
        .map(|maybe_row| {
            let (id, body) = maybe_row?;
            let value = serde_json::from_str(&body)?;

            Ok((id, value))
        })
        .collect()
}

/// Write `body` as the single document with `id` in `collection`.
///
/// This is a whole-document overwrite: any existing rows with the same id
/// (including duplicates) are removed first.
pub fn put_document(
    collection: &str,
    id: &str,
    body: &Value,
    connection: &Connection,
) -> Result<(), Error> {
    let body_text = serde_json::to_string(body)?;

    connection.execute(
        "DELETE FROM document WHERE collection = ?1 AND id = ?2;",
        (collection, id),
    )?;
    connection.execute(
        "INSERT INTO document (collection, id, body) VALUES (?1, ?2, ?3);",
        (collection, id, &body_text),
    )?;

    Ok(())
}

/// Delete every row holding the document with `id` in `collection`.
///
/// Deleting a missing document is not an error; the store has no tombstones
/// and deletion is idempotent.
pub fn delete_document(collection: &str, id: &str, connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "DELETE FROM document WHERE collection = ?1 AND id = ?2;",
        (collection, id),
    )?;

    Ok(())
}
