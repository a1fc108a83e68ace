use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Field semantics for partial updates.
///
/// - `Unchanged` → key absent, column untouched
/// - `SetToNull` → explicit `null`, column cleared
/// - `SetToValue` → column set to the provided value
///
/// Struct fields must carry `#[serde(default)]` so that an absent key
/// deserializes to `Unchanged`.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionField<T> {
    Unchanged,
    SetToNull,
    SetToValue(T),
}

impl<T> Default for OptionField<T> {
    fn default() -> Self {
        OptionField::Unchanged
    }
}

impl<'de, T> Deserialize<'de> for OptionField<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(|value| match value {
            Some(v) => OptionField::SetToValue(v),
            None => OptionField::SetToNull,
        })
    }
}

impl<T: Serialize> Serialize for OptionField<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            OptionField::SetToValue(v) => serializer.serialize_some(v),
            _ => serializer.serialize_none(),
        }
    }
}

impl<T> OptionField<T> {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }

    pub fn is_set_to_null(&self) -> bool {
        matches!(self, Self::SetToNull)
    }

    /// The new value, or `None` for both `Unchanged` and `SetToNull`.
    pub fn value_ref(&self) -> Option<&T> {
        if let Self::SetToValue(v) = self {
            Some(v)
        } else {
            None
        }
    }

    /// Resolves the value a column ends up with once this change is applied
    /// on top of `current`.
    pub fn merged_with(&self, current: Option<T>) -> Option<T>
    where
        T: Clone,
    {
        match self {
            Self::Unchanged => current,
            Self::SetToNull => None,
            Self::SetToValue(v) => Some(v.clone()),
        }
    }
}
