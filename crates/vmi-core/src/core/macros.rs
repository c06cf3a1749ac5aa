macro_rules! impl_ops {
    ($name:ident, $type:ty, $doc:expr) => {
        #[doc = concat!("A ", $doc, ".")]
        #[derive(
            Default,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        pub struct $name(pub $type);

        impl $name {
            #[doc = concat!("Checks if the `", stringify!($name), "` is zero.")]
            pub const fn is_null(self) -> bool {
                self.0 == 0
            }

            /// Checked addition of a raw offset.
            ///
            /// Returns `None` if the result would overflow.
            pub fn checked_add(self, rhs: $type) -> Option<Self> {
                self.0.checked_add(rhs).map(Self)
            }

            /// Checked subtraction of a raw offset.
            ///
            /// Returns `None` if the result would underflow.
            pub fn checked_sub(self, rhs: $type) -> Option<Self> {
                self.0.checked_sub(rhs).map(Self)
            }
        }

        impl From<$type> for $name {
            fn from(value: $type) -> Self {
                Self(value)
            }
        }

        impl From<$name> for $type {
            fn from(value: $name) -> $type {
                value.0
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(&$crate::Hex(self.0), f)
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(&$crate::Hex(self.0), f)
            }
        }
    };
}

pub(crate) use impl_ops;
