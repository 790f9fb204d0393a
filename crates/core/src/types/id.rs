//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. Order numbers are
//! customer-facing strings and get their own type.

use core::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `u64` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `PartialOrd`, `Ord`, `Hash`
/// - Conversion methods: `new()`, `as_u64()`, `next()`
/// - `From<u64>`, `Into<u64>` and `FromStr` implementations
///
/// # Example
///
/// ```rust
/// # use shopfront_core::define_id;
/// define_id!(WidgetId);
/// define_id!(GadgetId);
///
/// let widget = WidgetId::new(1);
/// let gadget = GadgetId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: WidgetId = gadget;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Create a new ID from a u64 value.
            #[must_use]
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// Get the underlying u64 value.
            #[must_use]
            pub const fn as_u64(&self) -> u64 {
                self.0
            }

            /// The ID following this one.
            #[must_use]
            pub const fn next(&self) -> Self {
                Self(self.0.saturating_add(1))
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<u64>().map(Self)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(ProductId);

/// Prefix shared by every order number.
const ORDER_PREFIX: &str = "ORD-";

/// Number of random characters after the prefix.
const ORDER_SUFFIX_LEN: usize = 8;

const ORDER_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Error returned when a string is not a well-formed order number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid order number: {0}")]
pub struct InvalidOrderNumber(pub String);

/// Customer-facing order reference, e.g. `ORD-7K2M9QXA`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Draw a fresh order number from the given random source.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let suffix: String = (0..ORDER_SUFFIX_LEN)
            .map(|_| {
                let idx = rng.random_range(0..ORDER_ALPHABET.len());
                char::from(ORDER_ALPHABET.get(idx).copied().unwrap_or(b'X'))
            })
            .collect();
        Self(format!("{ORDER_PREFIX}{suffix}"))
    }

    /// Parse an order number, accepting lowercase input.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOrderNumber` unless the input is `ORD-` followed by
    /// eight ASCII letters or digits.
    pub fn parse(s: &str) -> Result<Self, InvalidOrderNumber> {
        let upper = s.trim().to_ascii_uppercase();
        let valid = upper
            .strip_prefix(ORDER_PREFIX)
            .is_some_and(|suffix| {
                suffix.len() == ORDER_SUFFIX_LEN
                    && suffix.bytes().all(|b| ORDER_ALPHABET.contains(&b))
            });

        if valid {
            Ok(Self(upper))
        } else {
            Err(InvalidOrderNumber(s.to_string()))
        }
    }

    /// Returns the order number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for OrderNumber {
    type Err = InvalidOrderNumber;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for OrderNumber {
    type Error = InvalidOrderNumber;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<OrderNumber> for String {
    fn from(number: OrderNumber) -> Self {
        number.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn test_product_id_parse_and_next() {
        let id: ProductId = " 41 ".parse().unwrap();
        assert_eq!(id, ProductId::new(41));
        assert_eq!(id.next(), ProductId::new(42));
        assert!("abc".parse::<ProductId>().is_err());
    }

    #[test]
    fn test_product_id_serializes_as_number() {
        let json = serde_json::to_string(&ProductId::new(7)).unwrap();
        assert_eq!(json, "7");
    }

    #[test]
    fn test_generated_order_number_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let number = OrderNumber::generate(&mut rng);
        assert!(number.as_str().starts_with("ORD-"));
        assert_eq!(number.as_str().len(), 12);
        assert_eq!(OrderNumber::parse(number.as_str()).unwrap(), number);
    }

    #[test]
    fn test_order_number_parse_normalizes_case() {
        let number = OrderNumber::parse("ord-abcd1234").unwrap();
        assert_eq!(number.as_str(), "ORD-ABCD1234");
    }

    #[test]
    fn test_order_number_rejects_malformed() {
        assert!(OrderNumber::parse("ORD-123").is_err());
        assert!(OrderNumber::parse("INV-ABCD1234").is_err());
        assert!(OrderNumber::parse("ORD-ABCD-123").is_err());
        assert!(serde_json::from_str::<OrderNumber>("\"nope\"").is_err());
    }
}
