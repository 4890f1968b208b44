//! Views and API endpoints for creating, editing, deleting, reordering and
//! toggling products within a category.

mod create;
mod delete;
mod edit;
mod form;
mod reorder;
mod toggle;

pub use create::{CreateProductState, create_product, get_new_product_page};
pub use delete::{DeleteProductState, delete_product};
pub use edit::{EditProductState, get_edit_product_page, update_product};
pub use reorder::{MoveProductState, move_product};
pub use toggle::{
    ToggleProductState, featured_toggle_button, toggle_product_featured,
    toggle_product_visibility, visibility_toggle_button,
};
