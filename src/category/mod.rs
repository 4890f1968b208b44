//! Views and API endpoints for creating, editing, deleting and reordering
//! menu categories.

mod create;
mod delete;
mod edit;
mod reorder;

pub use create::{CreateCategoryState, create_category, get_new_category_page};
pub use delete::{DeleteCategoryState, delete_category};
pub use edit::{EditCategoryState, get_edit_category_page, update_category};
pub use reorder::{MoveCategoryState, move_category};

use maud::{Markup, html};

use crate::{
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
    menu::MAX_CATEGORY_NAME_LENGTH,
};

/// The name input shared by the new-category and edit-category forms.
fn category_name_input(name: &str, error_message: Option<&str>) -> Markup {
    html! {
        div
        {
            label
                for="name"
                class=(FORM_LABEL_STYLE)
            {
                "Name"
            }

            input
                type="text"
                name="name"
                id="name"
                placeholder="e.g. Pizzas"
                class=(FORM_TEXT_INPUT_STYLE)
                required
                maxlength=(MAX_CATEGORY_NAME_LENGTH)
                value=(name)
                autofocus[error_message.is_some()];

            @if let Some(error_message) = error_message
            {
                p class="text-red-500 text-base" { (error_message) }
            }
        }
    }
}
