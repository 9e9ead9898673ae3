//! Enums persisted as their integer ordinal

/// Declare a fieldless enum that serializes as its `u8` discriminant
///
/// Unknown ordinals fail deserialization, which surfaces as a parse error
/// when a settings file is loaded.
macro_rules! ordinal_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $value:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
            serde::Serialize, serde::Deserialize,
        )]
        #[serde(try_from = "u8", into = "u8")]
        $vis enum $name {
            $( $(#[$vmeta])* $variant = $value ),+
        }

        impl $name {
            /// Every variant in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> u8 {
                value as u8
            }
        }

        impl TryFrom<u8> for $name {
            type Error = String;

            fn try_from(raw: u8) -> ::std::result::Result<Self, String> {
                match raw {
                    $( $value => Ok($name::$variant), )+
                    other => Err(format!("{} is not a valid {}", other, stringify!($name))),
                }
            }
        }
    };
}

pub(crate) use ordinal_enum;

#[cfg(test)]
mod tests {
    ordinal_enum! {
        enum Sample {
            Zero = 0,
            Two = 2,
        }
    }

    #[test]
    fn test_serializes_as_ordinal() {
        assert_eq!(serde_json::to_string(&Sample::Two).unwrap(), "2");
        assert_eq!(serde_json::from_str::<Sample>("0").unwrap(), Sample::Zero);
    }

    #[test]
    fn test_all_lists_variants_in_order() {
        assert_eq!(Sample::ALL, &[Sample::Zero, Sample::Two]);
        let ordinals: Vec<u8> = Sample::ALL.iter().map(|s| u8::from(*s)).collect();
        assert_eq!(ordinals, vec![0, 2]);
    }

    #[test]
    fn test_unknown_ordinal_rejected() {
        let err = serde_json::from_str::<Sample>("1").unwrap_err();
        assert!(err.to_string().contains("not a valid Sample"));
    }

    #[test]
    fn test_ordinal_map_keys() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(Sample::Two, true);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"2":true}"#);
        let back: std::collections::BTreeMap<Sample, bool> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }
}
