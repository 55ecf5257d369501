//! Helper macro for upstream source error enums.
//!
//! Each generated enum derives `thiserror::Error`, gains one snake_case
//! constructor per variant that accepts `impl Into<_>` field values, and an
//! `is_retryable` predicate built from the `retryable:` list.

macro_rules! define_source_error {
    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        ::paste::paste! {
            #[doc = concat!("Build a [`Self::", stringify!($variant), "`] error.")]
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                Self::$variant { $($field: $field.into()),* }
            }
        }
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident { $($field:ident : $ty:ty),* $(,)? } => $message:expr
            ),* $(,)?
        }
        retryable: $($retry:ident),+ $(,)?
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant { $($field : $ty),* },
            )*
        }

        impl $name {
            $(
                define_source_error!(@ctor $variant { $($field : $ty),* });
            )*

            /// Return whether retrying the call is expected to help.
            pub fn is_retryable(&self) -> bool {
                matches!(self, $(Self::$retry { .. })|+)
            }
        }
    };
}

pub(crate) use define_source_error;

#[cfg(test)]
mod tests {
    define_source_error! {
        pub enum ExampleSourceError {
            Flaky { message: String } => "flaky: {message}",
            Rejected { message: String, status: u16 } => "rejected {status}: {message}",
        }
        retryable: Flaky
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = ExampleSourceError::flaky("socket reset");
        assert_eq!(err.to_string(), "flaky: socket reset");
    }

    #[test]
    fn constructors_support_mixed_fields() {
        let err = ExampleSourceError::rejected("denied", 403_u16);
        assert_eq!(err.to_string(), "rejected 403: denied");
    }

    #[test]
    fn retryable_list_drives_predicate() {
        assert!(ExampleSourceError::flaky("x").is_retryable());
        assert!(!ExampleSourceError::rejected("x", 400_u16).is_retryable());
    }
}
