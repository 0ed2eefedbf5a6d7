/// Defines a closed set of canonical tokens.
///
/// Each variant maps to exactly one token string, which is also its serde
/// representation. Unlike free-form identifiers there is no catch-all variant:
/// unknown tokens fail to deserialize and `from_token` returns `None`.
#[macro_export]
macro_rules! define_token_enum {
    (
        $(#[$enum_meta:meta])*
        $enum_name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $token:literal
            ),* $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $enum_name {
            $(
                $(#[$variant_meta])*
                $variant,
            )*
        }

        impl serde::Serialize for $enum_name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $enum_name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                Self::from_token(&s)
                    .ok_or_else(|| serde::de::Error::unknown_variant(&s, Self::TOKENS))
            }
        }

        impl $enum_name {
            pub const TOKENS: &'static [&'static str] = &[$($token),*];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(
                        Self::$variant => $token,
                    )*
                }
            }

            pub fn from_token(token: &str) -> Option<Self> {
                match token {
                    $(
                        $token => Some(Self::$variant),
                    )*
                    _ => None,
                }
            }

            pub fn all_variants() -> &'static [Self] {
                &[
                    $(
                        Self::$variant,
                    )*
                ]
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}
