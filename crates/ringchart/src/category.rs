use derive_more::{AsRef, Deref, Display, From, Into};
use palette::Srgba;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Color = Srgba<f64>;

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct CategoryId(String);

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct CategoryName(String);

/// Icon token. Hosts resolve it against their icon theme.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct SymbolName(String);

crate::impl_string_newtype!(CategoryId, CategoryName, SymbolName);

#[derive(Debug, Error, PartialEq)]
pub enum CategoryError {
    #[error("Category '{id}' has a negative value ({value})")]
    Negative { id: CategoryId, value: f64 },
    #[error("Category '{id}' has a non-finite value")]
    NonFinite { id: CategoryId },
}

/// One slice of the ring. Immutable once built; hosts replace whole sequences
/// instead of editing categories in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    id: CategoryId,
    name: CategoryName,
    value: f64,
    color: Color,
    symbol: SymbolName,
}

impl Category {
    pub fn new(
        id: impl Into<CategoryId>,
        name: impl Into<CategoryName>,
        value: f64,
        color: Color,
        symbol: impl Into<SymbolName>,
    ) -> Result<Self, CategoryError> {
        let id = id.into();
        if !value.is_finite() {
            return Err(CategoryError::NonFinite { id });
        }
        if value < 0.0 {
            return Err(CategoryError::Negative { id, value });
        }

        Ok(Self {
            id,
            name: name.into(),
            value,
            color,
            symbol: symbol.into(),
        })
    }

    pub fn id(&self) -> &CategoryId {
        &self.id
    }

    pub fn name(&self) -> &CategoryName {
        &self.name
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn symbol(&self) -> &SymbolName {
        &self.symbol
    }
}

/// Sum of all values. Recomputed on every call, never cached.
pub fn total(categories: &[Category]) -> f64 {
    categories.iter().map(Category::value).sum()
}

#[cfg(test)]
pub(crate) fn sample(id: &str, value: f64) -> Category {
    Category::new(
        id,
        id.to_uppercase(),
        value,
        Srgba::new(0.4, 0.5, 0.6, 1.0),
        "folder",
    )
    .unwrap()
}
