//! The product form shared by the new-product and edit-product pages, and
//! the validation applied to its submissions.

use maud::{Markup, html};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
    menu::Currency,
};

/// The fields submitted by the product form.
///
/// Checkboxes are only present in the form body when ticked, hence the
/// `Option<String>` fields.
#[derive(Serialize, Deserialize)]
pub struct ProductFormData {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub currency: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub featured: Option<String>,
    #[serde(default)]
    pub visible: Option<String>,
}

/// The validated content of a product form submission.
pub struct ValidatedProductForm {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub currency: Currency,
    pub image: Option<String>,
    pub featured: bool,
    pub visible: bool,
}

impl ProductFormData {
    /// Validate the submission.
    ///
    /// # Errors
    ///
    /// Returns [Error::MissingProductName] or
    /// [Error::MissingProductDescription] if the trimmed name or description
    /// is empty, or [Error::InvalidPrice] if the price is not greater than
    /// zero or not finite.
    pub fn validate(&self) -> Result<ValidatedProductForm, Error> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(Error::MissingProductName);
        }

        let description = self.description.trim();
        if description.is_empty() {
            return Err(Error::MissingProductDescription);
        }

        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(Error::InvalidPrice(self.price));
        }

        let image = self
            .image
            .as_deref()
            .map(str::trim)
            .filter(|image| !image.is_empty())
            .map(str::to_string);

        Ok(ValidatedProductForm {
            name: name.to_string(),
            description: description.to_string(),
            price: self.price,
            currency: parse_currency(&self.currency),
            image,
            featured: self.featured.is_some(),
            visible: self.visible.is_some(),
        })
    }
}

// The form's <select> only offers the supported codes; anything else falls
// back to the default currency.
fn parse_currency(code: &str) -> Currency {
    match code {
        "USD" => Currency::Usd,
        "EUR" => Currency::Eur,
        _ => Currency::Ars,
    }
}

/// The values used to pre-fill the product form.
#[derive(Default)]
pub struct ProductFormValues<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub price: Option<f64>,
    pub currency: Currency,
    pub image: &'a str,
    pub featured: bool,
    pub visible: bool,
}

impl ProductFormValues<'_> {
    /// The values for an empty new-product form: visible, not featured.
    pub fn empty() -> Self {
        Self {
            visible: true,
            ..Self::default()
        }
    }
}

/// Render the product form.
///
/// `action` is the htmx attribute and endpoint the form submits to, e.g.
/// `("hx-post", "/api/categories/c1/products")`.
pub fn product_form(
    action: (&str, &str),
    submit_label: &str,
    values: &ProductFormValues<'_>,
    error_message: Option<&str>,
) -> Markup {
    let (method_attribute, endpoint) = action;

    html! {
        form
            hx-post=[(method_attribute == "hx-post").then_some(endpoint)]
            hx-put=[(method_attribute == "hx-put").then_some(endpoint)]
            hx-target="this"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="w-full space-y-4"
        {
            div
            {
                label for="name" class=(FORM_LABEL_STYLE) { "Name" }
                input
                    type="text"
                    name="name"
                    id="name"
                    placeholder="e.g. Margherita"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required
                    value=(values.name);
            }

            div
            {
                label for="description" class=(FORM_LABEL_STYLE) { "Description" }
                textarea
                    name="description"
                    id="description"
                    rows="3"
                    placeholder="e.g. Tomato, mozzarella and basil"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required
                {
                    (values.description)
                }
            }

            div
            {
                label for="price" class=(FORM_LABEL_STYLE) { "Price" }
                input
                    type="number"
                    name="price"
                    id="price"
                    step="0.01"
                    min="0.01"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required
                    value=[values.price.map(|price| format!("{price:.2}"))];
            }

            div
            {
                label for="currency" class=(FORM_LABEL_STYLE) { "Currency" }
                select name="currency" id="currency" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for currency in [Currency::Ars, Currency::Usd, Currency::Eur]
                    {
                        option
                            value=(currency.code())
                            selected[currency == values.currency]
                        {
                            (currency.code())
                        }
                    }
                }
            }

            div
            {
                label for="image" class=(FORM_LABEL_STYLE) { "Image URL (optional)" }
                input
                    type="url"
                    name="image"
                    id="image"
                    placeholder="https://..."
                    class=(FORM_TEXT_INPUT_STYLE)
                    value=(values.image);
            }

            div class="flex gap-6"
            {
                label class="flex items-center gap-2 text-sm text-gray-900 dark:text-white"
                {
                    input type="checkbox" name="visible" checked[values.visible];
                    "Visible"
                }

                label class="flex items-center gap-2 text-sm text-gray-900 dark:text-white"
                {
                    input type="checkbox" name="featured" checked[values.featured];
                    "Featured"
                }
            }

            @if let Some(error_message) = error_message
            {
                p class="text-red-500 text-base" { (error_message) }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { (submit_label) }
        }
    }
}

#[cfg(test)]
mod product_form_tests {
    use crate::{Error, menu::Currency};

    use super::ProductFormData;

    fn valid_form() -> ProductFormData {
        ProductFormData {
            name: "Margherita".to_string(),
            description: "Tomato and mozzarella".to_string(),
            price: 10.5,
            currency: "ARS".to_string(),
            image: None,
            featured: None,
            visible: Some("on".to_string()),
        }
    }

    #[test]
    fn validate_accepts_a_complete_form() {
        let validated = valid_form().validate().unwrap();

        assert_eq!(validated.name, "Margherita");
        assert_eq!(validated.currency, Currency::Ars);
        assert!(validated.visible);
        assert!(!validated.featured);
        assert_eq!(validated.image, None);
    }

    #[test]
    fn validate_rejects_blank_name() {
        let mut form = valid_form();
        form.name = "  ".to_string();

        assert_eq!(form.validate().err(), Some(Error::MissingProductName));
    }

    #[test]
    fn validate_rejects_blank_description() {
        let mut form = valid_form();
        form.description = String::new();

        assert_eq!(
            form.validate().err(),
            Some(Error::MissingProductDescription)
        );
    }

    #[test]
    fn validate_rejects_non_positive_price() {
        let mut form = valid_form();
        form.price = 0.0;

        assert_eq!(form.validate().err(), Some(Error::InvalidPrice(0.0)));

        form.price = -3.5;
        assert_eq!(form.validate().err(), Some(Error::InvalidPrice(-3.5)));
    }

    #[test]
    fn validate_treats_blank_image_as_absent() {
        let mut form = valid_form();
        form.image = Some("   ".to_string());

        assert_eq!(form.validate().unwrap().image, None);
    }

    #[test]
    fn validate_parses_currency_codes() {
        let mut form = valid_form();
        form.currency = "EUR".to_string();

        assert_eq!(form.validate().unwrap().currency, Currency::Eur);
    }
}
