//! Type-safe identifiers for world entities.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// A fresh random id, e.g. `army_3f9c0d1e22b4a871`.
            pub fn generate() -> Self {
                Self(format!(concat!($prefix, "_{:016x}"), rand::random::<u64>()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

entity_id!(
    /// Identifier of a registered user.
    UserId,
    "user"
);
entity_id!(CityId, "city");
entity_id!(BuildingId, "building");
entity_id!(ArmyId, "army");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_carry_prefix_and_differ() {
        let a = ArmyId::generate();
        let b = ArmyId::generate();
        assert!(a.as_str().starts_with("army_"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = CityId::from("city_7");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"city_7\"");
        assert_eq!(id.to_string(), "city_7");
    }
}
