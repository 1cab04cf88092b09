use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Eating occasion. Stored as INT4 (1..=4), accepted on input as either the
/// name or the code, always written out as the name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[repr(i32)]
pub enum MealType {
    Breakfast = 1,
    Lunch = 2,
    Dinner = 3,
    Snack = 4,
}

impl MealType {
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|t| *t as i64 == code)
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for MealType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MealType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MealTypeVisitor;

        impl<'de> de::Visitor<'de> for MealTypeVisitor {
            type Value = MealType;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("one of breakfast, lunch, dinner, snack or a code 1-4")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<MealType, E> {
                MealType::from_name(v).ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<MealType, E> {
                MealType::from_code(v).ok_or_else(|| E::invalid_value(de::Unexpected::Signed(v), &self))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<MealType, E> {
                i64::try_from(v)
                    .ok()
                    .and_then(MealType::from_code)
                    .ok_or_else(|| E::invalid_value(de::Unexpected::Unsigned(v), &self))
            }
        }

        deserializer.deserialize_any(MealTypeVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_names_and_codes() {
        let by_name: MealType = serde_json::from_str("\"dinner\"").unwrap();
        let by_code: MealType = serde_json::from_str("3").unwrap();
        assert_eq!(by_name, MealType::Dinner);
        assert_eq!(by_code, MealType::Dinner);
    }

    #[test]
    fn always_encodes_as_name() {
        assert_eq!(serde_json::to_string(&MealType::Snack).unwrap(), "\"snack\"");
        let decoded: MealType = serde_json::from_str("1").unwrap();
        assert_eq!(serde_json::to_string(&decoded).unwrap(), "\"breakfast\"");
    }

    #[test]
    fn rejects_unknown_values() {
        assert!(serde_json::from_str::<MealType>("\"brunch\"").is_err());
        assert!(serde_json::from_str::<MealType>("0").is_err());
        assert!(serde_json::from_str::<MealType>("5").is_err());
        assert!(serde_json::from_str::<MealType>("true").is_err());
    }
}
