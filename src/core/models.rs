use std::str::FromStr;

use chrono::NaiveDate;
use serde::{
    Deserialize,
    Serialize,
};

use super::TansuError;

/// Number of physical storage boxes in the closet.
pub const BOX_COUNT: usize = 7;

/// Clothing category, matching the labels the classifier is trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Coat,
    Padding,
    Shortsleeve,
    Longsleeve,
    Shirt,
    Pants,
    Dress,
}

impl Category {
    /// All categories, in classifier label order (index 0-6).
    pub const ALL: [Category; BOX_COUNT] = [
        Category::Coat,
        Category::Padding,
        Category::Shortsleeve,
        Category::Longsleeve,
        Category::Shirt,
        Category::Pants,
        Category::Dress,
    ];

    /// Look up a category by its classifier label index.
    pub fn from_index(index: usize) -> Result<Category, TansuError> {
        Category::ALL
            .get(index)
            .copied()
            .ok_or(TansuError::UnknownCategoryIndex(index))
    }

    pub fn index(&self) -> usize {
        Category::ALL.iter().position(|c| c == self).unwrap_or(0)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Coat => "coat",
            Category::Padding => "padding",
            Category::Shortsleeve => "shortsleeve",
            Category::Longsleeve => "longsleeve",
            Category::Shirt => "shirt",
            Category::Pants => "pants",
            Category::Dress => "dress",
        }
    }
}

impl FromStr for Category {
    type Err = TansuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .find(|c| c.as_str() == s)
            .copied()
            .ok_or_else(|| TansuError::UnknownCategory(s.to_string()))
    }
}

/// One tracked clothing item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cloth {
    /// User-chosen nickname, unique across the whole closet.
    pub name: String,
    pub category: Category,
    /// Times worn.
    pub count: u32,
    /// Where the item's photo lives on disk. The store only records the
    /// path, it never touches the image bytes.
    pub img_path: String,
    pub feature_path: String,
    /// `None` means never worn, stored as "0000-00-00" in the document.
    #[serde(with = "wear_date")]
    pub last_wear_date: Option<NaiveDate>,
}

impl Cloth {
    pub fn new(box_number: usize, category: Category, name: &str) -> Self {
        Self {
            name: name.to_string(),
            category,
            count: 0,
            img_path: format!("images/box/box{}/{}.jpg", box_number, name),
            feature_path: format!("static/feature/f_{}.npy", name),
            last_wear_date: None,
        }
    }

    pub fn never_worn(&self) -> bool {
        self.last_wear_date.is_none()
    }
}

/// One physical storage compartment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageBox {
    /// Physical slot identifier, 1-based.
    pub position: u32,
    /// Categories this box is designated to hold.
    pub category_to_save: Vec<Category>,
    /// Maximum item count.
    pub capacity: usize,
    /// Current item count, kept equal to `clothes_list.len()`.
    pub used: usize,
    pub clothes_list: Vec<Cloth>,
}

impl StorageBox {
    pub fn new(position: u32, capacity: usize) -> Self {
        Self {
            position,
            category_to_save: Vec::new(),
            capacity,
            used: 0,
            clothes_list: Vec::new(),
        }
    }

    pub fn is_full(&self) -> bool {
        self.used == self.capacity
    }

    pub(crate) fn recount(&mut self) {
        self.used = self.clothes_list.len();
    }
}

/// The root persisted document: exactly [`BOX_COUNT`] boxes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Closet {
    #[serde(rename = "closet")]
    pub boxes: Vec<StorageBox>,
}

impl Closet {
    /// Fresh closet with empty boxes at positions 1-7, each with the same
    /// capacity.
    pub fn new(capacity: usize) -> Self {
        let boxes =
            (1..=BOX_COUNT as u32).map(|position| StorageBox::new(position, capacity)).collect();
        Self { boxes }
    }

    /// Convert a 1-based box number into an index into `boxes`.
    pub fn box_index(box_number: usize) -> Result<usize, TansuError> {
        if (1..=BOX_COUNT).contains(&box_number) {
            Ok(box_number - 1)
        } else {
            Err(TansuError::BoxOutOfRange(box_number))
        }
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.boxes.iter().any(|b| b.clothes_list.iter().any(|c| c.name == name))
    }

    /// Every cloth in box order then item order, with its 1-based box number.
    pub fn iter_cloths(&self) -> impl Iterator<Item = (usize, &Cloth)> {
        self.boxes
            .iter()
            .enumerate()
            .flat_map(|(i, b)| b.clothes_list.iter().map(move |c| (i + 1, c)))
    }
}

/// Serde adapter for `last_wear_date`: the document keeps the original
/// "0000-00-00" sentinel for items that were never worn.
pub mod wear_date {
    use chrono::NaiveDate;
    use serde::{
        self,
        Deserialize,
        Deserializer,
        Serializer,
    };

    pub const NEVER_WORN: &str = "0000-00-00";
    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_str(&d.format(FORMAT).to_string()),
            None => serializer.serialize_str(NEVER_WORN),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if s == NEVER_WORN {
            return Ok(None);
        }
        NaiveDate::parse_from_str(&s, FORMAT).map(Some).map_err(serde::de::Error::custom)
    }
}
