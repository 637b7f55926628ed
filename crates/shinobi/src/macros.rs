#[macro_export]
macro_rules! impl_label_newtype {
    ($name:ty) => {
        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Case-folded form used for duplicate checks.
            pub fn folded(&self) -> String {
                self.0.to_lowercase()
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}
