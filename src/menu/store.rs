//! The synchronization adapter between the in-memory menu and the document
//! store.
//!
//! Categories are persisted as whole documents with their products embedded,
//! so every product-level mutation is expressed as "mutate the category in
//! memory, then save the full category". The adapter owns the defaulting and
//! repair work at the boundary: missing fields get defaults, empty-string
//! images become `None`, embedded `categoryId` back-references are stamped to
//! match the owning document, and duplicated document ids are collapsed.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;
use serde_json::Value;

use crate::{
    Error,
    document::{delete_document, get_all_documents, put_document},
    menu::{Category, new_record_id, sort_for_display},
    user::UserID,
};

/// The collection holding one document per menu category.
pub const CATEGORY_COLLECTION: &str = "categories";

/// The result of loading the menu from the document store.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedMenu {
    /// All categories in display order, including hidden products.
    pub categories: Vec<Category>,
    /// Ids that appeared on more than one document; all but the first copy
    /// were deleted. Non-empty means the user should be notified.
    pub repaired_ids: Vec<String>,
}

/// Reads and writes menu categories to the document store on behalf of one
/// authenticated owner.
///
/// The owner identity is passed in explicitly at construction rather than
/// read from any ambient session state, and is used to attribute writes in
/// the logs.
#[derive(Debug, Clone)]
pub struct MenuStore {
    connection: Arc<Mutex<Connection>>,
    owner: UserID,
}

impl MenuStore {
    /// Create a menu store for `owner` backed by the shared connection.
    pub fn new(connection: Arc<Mutex<Connection>>, owner: UserID) -> Self {
        Self { connection, owner }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
    }

    /// Load every category, repair corruption, and return the result sorted
    /// for display.
    ///
    /// Documents sharing an id are treated as corruption: the first copy
    /// wins, the rest are deleted, and the affected ids are reported in
    /// [LoadedMenu::repaired_ids] so the caller can notify the user.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read or a document body
    /// cannot be parsed.
    pub fn load(&self) -> Result<LoadedMenu, Error> {
        let connection = self.lock()?;
        let documents = get_all_documents(CATEGORY_COLLECTION, &connection)?;
        let (categories, repaired_ids) = reconcile_documents(documents)?;

        for id in &repaired_ids {
            let corruption = Error::DuplicateDocument {
                collection: CATEGORY_COLLECTION.to_string(),
                id: id.clone(),
            };
            tracing::warn!(owner = self.owner.as_i64(), "repairing: {corruption}");

            if let Some(survivor) = categories.iter().find(|category| &category.id == id) {
                // put_document removes every row with the id before
                // inserting, so this leaves exactly one copy behind.
                put_document(
                    CATEGORY_COLLECTION,
                    id,
                    &serde_json::to_value(survivor)?,
                    &connection,
                )?;
            }
        }

        Ok(LoadedMenu {
            categories: sort_for_display(categories),
            repaired_ids,
        })
    }

    /// Persist `category` as a whole-document overwrite, embedded products
    /// included.
    ///
    /// The embedded products' `categoryId` back-references are stamped with
    /// the category's id before writing, so stored documents always satisfy
    /// the ownership invariant regardless of what the caller assembled.
    ///
    /// # Errors
    /// Returns an error if the document cannot be serialized or written.
    pub fn save(&self, category: &Category) -> Result<(), Error> {
        let connection = self.lock()?;
        let body = category_document(category)?;

        put_document(CATEGORY_COLLECTION, &category.id, &body, &connection)?;

        tracing::debug!(
            owner = self.owner.as_i64(),
            "saved category {} with {} product(s)",
            category.id,
            category.products.len()
        );

        Ok(())
    }

    /// Write a new category document, assigning an id if the caller left it
    /// empty, and return the id under which it was stored.
    ///
    /// # Errors
    /// Returns an error if the document cannot be serialized or written.
    pub fn create(&self, mut category: Category) -> Result<String, Error> {
        if category.id.is_empty() {
            category.id = new_record_id();
        }

        self.save(&category)?;

        Ok(category.id)
    }

    /// Delete the category document outright.
    ///
    /// Products have no documents of their own, so this cascades: the
    /// embedded products disappear with the category. There is no product
    /// delete endpoint; removing a single product is a [MenuStore::save]
    /// with the product taken out of the list.
    ///
    /// # Errors
    /// Returns an error if the store cannot be written.
    pub fn remove(&self, category_id: &str) -> Result<(), Error> {
        let connection = self.lock()?;

        delete_document(CATEGORY_COLLECTION, category_id, &connection)?;

        tracing::debug!(owner = self.owner.as_i64(), "deleted category {category_id}");

        Ok(())
    }
}

/// Read the categories for the public menu page without repairing the store.
///
/// The public path must not mutate: duplicated ids are resolved by keeping
/// the first copy in memory and leaving the store untouched, so a diner
/// request never races the owner's repair.
///
/// # Errors
/// Returns an error if the store cannot be read or a document body cannot be
/// parsed.
pub fn read_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    let documents = get_all_documents(CATEGORY_COLLECTION, connection)?;
    let (categories, _) = reconcile_documents(documents)?;

    Ok(sort_for_display(categories))
}

/// Parse raw documents into categories, keeping the first copy of any
/// duplicated id and normalizing each survivor.
///
/// Returns the surviving categories (in document order) and the duplicated
/// ids.
fn reconcile_documents(
    documents: Vec<(String, Value)>,
) -> Result<(Vec<Category>, Vec<String>), Error> {
    let mut categories: Vec<Category> = Vec::with_capacity(documents.len());
    let mut repaired_ids = Vec::new();

    for (id, body) in documents {
        if categories.iter().any(|category| category.id == id) {
            if !repaired_ids.contains(&id) {
                repaired_ids.push(id);
            }
            continue;
        }

        let mut category: Category = serde_json::from_value(body)?;
        // The row key is authoritative over whatever the body claims.
        category.id = id;
        normalize_category(&mut category);
        categories.push(category);
    }

    Ok((categories, repaired_ids))
}

fn normalize_category(category: &mut Category) {
    for product in &mut category.products {
        if product.image.as_deref() == Some("") {
            product.image = None;
        }

        if product.category_id != category.id {
            tracing::debug!(
                "repairing categoryId on product {} ({} -> {})",
                product.id,
                product.category_id,
                category.id
            );
            product.category_id = category.id.clone();
        }
    }
}

fn category_document(category: &Category) -> Result<Value, Error> {
    let mut stamped = category.clone();
    for product in &mut stamped.products {
        product.category_id = stamped.id.clone();

        if product.image.as_deref() == Some("") {
            product.image = None;
        }
    }

    Ok(serde_json::to_value(&stamped)?)
}
