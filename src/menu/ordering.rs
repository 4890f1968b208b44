//! The pure ordering and filtering engine.
//!
//! Every function here takes the category list by value and returns the new
//! list; nothing touches the database. The display order of categories and
//! products is derived from their `order` fields with a stable sort, so ties
//! keep their original relative position and `order` gaps are harmless.
//!
//! List-mutating operations treat out-of-range indices and unknown ids as
//! no-ops so that a stale page (e.g. one rendered before a concurrent edit)
//! cannot crash the server.

use crate::{
    Error,
    menu::{Category, CategoryName, Product},
};

/// Sort categories by `order` ascending, and each category's products by
/// `order` ascending.
///
/// Both sorts are stable, so entries with equal `order` keep their original
/// relative position. Applying this twice yields the same result as once.
pub fn sort_for_display(mut categories: Vec<Category>) -> Vec<Category> {
    categories.sort_by_key(|category| category.order);

    for category in &mut categories {
        category.products.sort_by_key(|product| product.order);
    }

    categories
}

/// Move the category at `from` to position `to` and renumber every
/// category's `order` field to its new 0-based, contiguous position.
///
/// Out-of-range indices leave the list unchanged.
pub fn reorder_categories(mut categories: Vec<Category>, from: usize, to: usize) -> Vec<Category> {
    if from >= categories.len() || to >= categories.len() {
        return categories;
    }

    let category = categories.remove(from);
    categories.insert(to, category);

    for (position, category) in categories.iter_mut().enumerate() {
        category.order = position as i64;
    }

    categories
}

/// Move the product at `from` to position `to` within the category
/// identified by `category_id`, renumbering only that category's products.
///
/// An unknown category id or out-of-range indices leave the list unchanged.
pub fn reorder_products(
    mut categories: Vec<Category>,
    category_id: &str,
    from: usize,
    to: usize,
) -> Vec<Category> {
    let Some(category) = categories
        .iter_mut()
        .find(|category| category.id == category_id)
    else {
        return categories;
    };

    if from >= category.products.len() || to >= category.products.len() {
        return categories;
    }

    let product = category.products.remove(from);
    category.products.insert(to, product);

    for (position, product) in category.products.iter_mut().enumerate() {
        product.order = position as i64;
    }

    categories
}

/// Restrict each category to its visible products, dropping categories that
/// end up with no products at all.
///
/// This is the category half of the public projection: diners never see
/// hidden products or empty sections, while the edit view keeps both.
pub fn filter_visible(categories: Vec<Category>) -> Vec<Category> {
    categories
        .into_iter()
        .map(|mut category| {
            category.products.retain(|product| product.visible);
            category
        })
        .filter(|category| !category.products.is_empty())
        .collect()
}

/// Flatten all products across categories, keeping only those that are both
/// featured and visible.
///
/// The result follows category order then product order; no other key is
/// used to re-sort.
pub fn collect_featured(categories: &[Category]) -> Vec<Product> {
    categories
        .iter()
        .flat_map(|category| &category.products)
        .filter(|product| product.visible && product.featured)
        .cloned()
        .collect()
}

/// Flip the `visible` flag on the product identified by `product_id`,
/// leaving every other field and the ordering untouched.
///
/// An unknown id leaves the list unchanged. Applying this twice restores the
/// original flag.
pub fn toggle_visibility(mut categories: Vec<Category>, product_id: &str) -> Vec<Category> {
    for category in &mut categories {
        if let Some(product) = category
            .products
            .iter_mut()
            .find(|product| product.id == product_id)
        {
            product.visible = !product.visible;
            break;
        }
    }

    categories
}

/// Flip the `featured` flag on the product identified by `product_id`.
///
/// Same no-op and self-inverse behaviour as [toggle_visibility].
pub fn toggle_featured(mut categories: Vec<Category>, product_id: &str) -> Vec<Category> {
    for category in &mut categories {
        if let Some(product) = category
            .products
            .iter_mut()
            .find(|product| product.id == product_id)
        {
            product.featured = !product.featured;
            break;
        }
    }

    categories
}

/// Compare two category names ignoring letter case.
///
/// Comparison is done `char` by `char` through [char::to_lowercase], so
/// accented names like "Café" and "CAFÉ" collide too. No locale rules are
/// applied.
pub fn names_equal_ignore_case(left: &str, right: &str) -> bool {
    left.chars()
        .flat_map(char::to_lowercase)
        .eq(right.chars().flat_map(char::to_lowercase))
}

/// Rename the category identified by `category_id` to `new_name`.
///
/// # Errors
///
/// Returns a validation error ([Error::EmptyCategoryName],
/// [Error::CategoryNameTooLong] or [Error::DuplicateCategoryName]) without
/// modifying the list if the trimmed name is empty, too long, or collides
/// case-insensitively with another category's current name.
pub fn rename_category(
    categories: Vec<Category>,
    category_id: &str,
    new_name: &str,
) -> Result<Vec<Category>, Error> {
    let name = CategoryName::new(new_name)?;

    let collides = categories.iter().any(|category| {
        category.id != category_id && names_equal_ignore_case(&category.name, name.as_ref())
    });
    if collides {
        return Err(Error::DuplicateCategoryName(name.to_string()));
    }

    let mut categories = categories;
    for category in &mut categories {
        if category.id == category_id {
            category.name = name.to_string();
            break;
        }
    }

    Ok(categories)
}
