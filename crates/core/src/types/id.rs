//! Newtype tokens for type-safe checkout references.
//!
//! Use the `define_token!` macro to create string-backed wrappers that prevent
//! accidentally passing a shipping rate ID where a checkout token is expected.

/// Errors that can occur when parsing a token.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The input string is empty or whitespace.
    #[error("{kind} cannot be empty")]
    Empty {
        /// Name of the token type being parsed.
        kind: &'static str,
    },
}

/// Macro to define a type-safe, string-backed token wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - `new()` (unchecked), `parse()` (rejects blank input), `as_str()`
/// - `Display`, `AsRef<str>` and `From<&str>` / `From<String>`
///
/// # Example
///
/// ```rust
/// # use wallet_checkout_core::define_token;
/// define_token!(CartToken);
/// define_token!(OrderToken);
///
/// let cart = CartToken::new("abc");
/// let order = OrderToken::new("abc");
///
/// // These are different types, so this won't compile:
/// // let _: CartToken = order;
/// # let _ = (cart, order);
/// ```
#[macro_export]
macro_rules! define_token {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw value without checking it.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Parse a token, rejecting blank input.
            ///
            /// # Errors
            ///
            /// Returns `TokenError::Empty` if the input is empty or only
            /// whitespace.
            pub fn parse(value: &str) -> ::core::result::Result<Self, $crate::TokenError> {
                if value.trim().is_empty() {
                    return Err($crate::TokenError::Empty {
                        kind: stringify!($name),
                    });
                }
                Ok(Self(value.to_owned()))
            }

            /// Returns the token as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

define_token!(CheckoutToken);
define_token!(ShippingRateId);
define_token!(LineItemId);
