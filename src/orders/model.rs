use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    cart::model::CartItem,
    error::FieldErrors,
    validation::{char_len, is_valid_email, is_valid_phone, push},
};

pub const PENDING: &str = "Pending";

/// Delivery and contact details captured at checkout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeliveryDetails {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub street_address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl DeliveryDetails {
    /// Trims every field and checks it; blank notes become `None`.
    pub fn validate(mut self) -> Result<Self, FieldErrors> {
        for field in [
            &mut self.full_name,
            &mut self.email,
            &mut self.phone,
            &mut self.street_address,
            &mut self.city,
            &mut self.postal_code,
            &mut self.country,
        ] {
            *field = field.trim().to_string();
        }
        self.notes = crate::validation::non_blank(self.notes);

        let mut errors = FieldErrors::new();
        min_len(&mut errors, "full_name", &self.full_name, 2, "Full name must be at least 2 characters.");
        if !is_valid_email(&self.email) {
            push(&mut errors, "email", "Invalid email address.");
        }
        min_len(&mut errors, "phone", &self.phone, 10, "Phone number must be at least 10 digits.");
        if !is_valid_phone(&self.phone) {
            push(&mut errors, "phone", "Invalid phone number format");
        }
        min_len(&mut errors, "street_address", &self.street_address, 5, "Street address is too short.");
        min_len(&mut errors, "city", &self.city, 2, "City name is too short.");
        min_len(&mut errors, "postal_code", &self.postal_code, 4, "Postal code is too short.");
        min_len(&mut errors, "country", &self.country, 2, "Country name is too short.");

        if errors.is_empty() {
            Ok(self)
        } else {
            Err(errors)
        }
    }
}

fn min_len(errors: &mut FieldErrors, field: &'static str, value: &str, n: usize, message: &str) {
    if char_len(value) < n {
        push(errors, field, message);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub delivery_details: DeliveryDetails,
    pub items: Vec<CartItem>,
    pub total_amount: Decimal,
    pub status: String,
}

impl Order {
    pub fn id_for(at: OffsetDateTime) -> String {
        format!("order_{}", at.unix_timestamp_nanos() / 1_000_000)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use time::macros::datetime;

    pub(crate) fn details() -> DeliveryDetails {
        DeliveryDetails {
            full_name: "Ada Grower".into(),
            email: "ada@farm.test".into(),
            phone: "+1 234 567 8900".into(),
            street_address: "123 Veggie Lane".into(),
            city: "Greenville".into(),
            postal_code: "12345".into(),
            country: "United States".into(),
            notes: Some("   ".into()),
        }
    }

    #[test]
    fn valid_details_are_normalized() {
        let d = details().validate().unwrap();
        assert_eq!(d.notes, None);
    }

    #[test]
    fn each_short_field_is_reported() {
        let d = DeliveryDetails {
            full_name: "A".into(),
            email: "nope".into(),
            phone: "12ab".into(),
            street_address: "1 A".into(),
            city: "X".into(),
            postal_code: "12".into(),
            country: "U".into(),
            notes: None,
        };
        let errors = d.validate().unwrap_err();
        for field in [
            "full_name",
            "email",
            "phone",
            "street_address",
            "city",
            "postal_code",
            "country",
        ] {
            assert!(errors.contains_key(field), "missing {field}");
        }
        assert_eq!(errors["phone"].len(), 2);
    }

    #[test]
    fn order_id_uses_millis() {
        let at = datetime!(2024-05-01 12:00:00.123 UTC);
        assert_eq!(Order::id_for(at), "order_1714564800123");
    }
}
