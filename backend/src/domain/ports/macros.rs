//! Declarative builder for port error enums.
//!
//! Every variant gets a `thiserror` message and a snake_case constructor
//! taking one `impl Into<_>` argument per field, so adapters can pass `&str`
//! for `String` fields.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( {
                    $(
                        #[allow(missing_docs, reason = "fields are described by the variant message")]
                        $field : $ty
                    ),*
                } )?,
            )*
        }

        ::paste::paste! {
            impl $name {
                $(
                    #[doc = concat!("Build [`", stringify!($name), "::", stringify!($variant), "`].")]
                    pub fn [<$variant:snake>]($( $( $field: impl Into<$ty> ),* )?) -> Self {
                        // Braces also construct unit variants.
                        Self::$variant { $( $( $field: $field.into() ),* )? }
                    }
                )*
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    use crate::domain::ports::{BabyRecordRepositoryError, ImageGenerationError, MediaFetchError};
    use rstest::rstest;

    #[rstest]
    #[case(MediaFetchError::transport("reset").to_string(), "media transport failed: reset")]
    #[case(MediaFetchError::status(503_u16).to_string(), "media fetch returned status 503")]
    #[case(MediaFetchError::empty_body().to_string(), "media fetch returned an empty body")]
    #[case(
        BabyRecordRepositoryError::duplicate_id(String::from("abc")).to_string(),
        "baby record abc already exists"
    )]
    fn constructors_render_variant_messages(
        #[case] rendered: String,
        #[case] expected: &str,
    ) {
        assert_eq!(rendered, expected);
    }

    #[rstest]
    fn multi_field_constructors_keep_argument_order() {
        let error = ImageGenerationError::rejected(429_u16, "slow down");

        assert_eq!(
            error,
            ImageGenerationError::Rejected {
                status: 429,
                message: "slow down".to_owned(),
            }
        );
    }

    #[rstest]
    fn unit_constructors_match_the_variant() {
        assert_eq!(MediaFetchError::empty_body(), MediaFetchError::EmptyBody);
    }
}
