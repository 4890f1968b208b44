//! The menu model: categories owning ordered products, the pure ordering and
//! visibility engine, and the synchronization adapter that persists categories
//! as whole documents.

mod domain;
mod ordering;
mod store;

pub use domain::{
    Category, CategoryName, Currency, MAX_CATEGORY_NAME_LENGTH, Product, new_record_id,
};
pub use ordering::{
    collect_featured, filter_visible, names_equal_ignore_case, rename_category,
    reorder_categories, reorder_products, sort_for_display, toggle_featured, toggle_visibility,
};
pub use store::{CATEGORY_COLLECTION, LoadedMenu, MenuStore, read_categories};
