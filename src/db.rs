//! Database initialization for the application.

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{Error, document::create_document_table, user::create_user_table};

/// Create the tables the application needs, inside a single exclusive
/// transaction.
///
/// Safe to call on every start-up; all statements are `IF NOT EXISTS`.
///
/// # Errors
/// Returns an error if a table could not be created or the transaction could
/// not be committed.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_document_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
