//! Checkout form.

use serde::Deserialize;

use crate::order::CustomerDetails;
use crate::types::{Email, PaymentMethod};
use crate::validation::ValidationErrors;

/// Raw checkout form submission.
///
/// Checkboxes and radios arrive as optional strings; an unchecked box is
/// simply absent from the submission.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip: String,
    #[serde(default)]
    pub same_address: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
}

impl Default for CheckoutForm {
    /// The blank form: billing same as shipping, cash on delivery.
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            zip: String::new(),
            same_address: Some("on".to_string()),
            payment_method: Some("cash".to_string()),
        }
    }
}

impl CheckoutForm {
    #[must_use]
    pub fn same_address(&self) -> bool {
        self.same_address
            .as_deref()
            .is_some_and(|v| !v.is_empty() && v != "false")
    }

    /// Selected payment method; `None` for an unrecognized value.
    #[must_use]
    pub fn payment(&self) -> Option<PaymentMethod> {
        match self.payment_method.as_deref().map(str::trim) {
            None | Some("" | "cash" | "cash_on_delivery") => Some(PaymentMethod::CashOnDelivery),
            Some("card") => Some(PaymentMethod::Card),
            Some(_) => None,
        }
    }

    /// Validate the whole form.
    ///
    /// # Errors
    ///
    /// Returns every field failure at once.
    pub fn validate(&self) -> Result<(CustomerDetails, PaymentMethod), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        errors.require("first_name", "First name", &self.first_name);
        errors.require("last_name", "Last name", &self.last_name);

        let email = if self.email.trim().is_empty() {
            errors.add("email", "Email is required");
            None
        } else {
            Email::parse(&self.email)
                .map_err(|_| errors.add("email", "Please enter a valid email address"))
                .ok()
        };

        errors.require("address", "Address", &self.address);
        errors.require("city", "City", &self.city);
        errors.require("state", "State", &self.state);
        errors.require("zip", "ZIP code", &self.zip);

        let payment = match self.payment() {
            Some(method) if method.is_available() => Some(method),
            Some(method) => {
                errors.add(
                    "payment_method",
                    format!("{} is not available yet", method.label()),
                );
                None
            }
            None => {
                errors.add("payment_method", "Please choose a payment method");
                None
            }
        };

        match (email, payment) {
            (Some(email), Some(payment)) if errors.is_empty() => {
                let phone = self.phone.trim();
                let customer = CustomerDetails {
                    first_name: self.first_name.trim().to_string(),
                    last_name: self.last_name.trim().to_string(),
                    email,
                    phone: (!phone.is_empty()).then(|| phone.to_string()),
                    address: self.address.trim().to_string(),
                    city: self.city.trim().to_string(),
                    state: self.state.trim().to_string(),
                    zip: self.zip.trim().to_string(),
                    same_address: self.same_address(),
                };
                Ok((customer, payment))
            }
            _ => Err(errors),
        }
    }
}
