use serde::{Deserialize, Serialize};

/// A top-up package from the catalog.
///
/// `id` is the store-assigned ObjectId rendered as a hex string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub id: String,
    pub name: String,
    pub diamonds: i64,
    #[serde(default)]
    pub bonus: i64,
    pub price: f64,
    #[serde(default)]
    pub popular: bool,
}

/// A package definition that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPackage {
    pub name: String,
    pub diamonds: i64,
    pub bonus: i64,
    pub price: f64,
    pub popular: bool,
}

impl NewPackage {
    fn new(diamonds: i64, bonus: i64, price: f64, popular: bool) -> Self {
        Self {
            name: format!("{} Diamonds", diamonds),
            diamonds,
            bonus,
            price,
            popular,
        }
    }
}

/// The fixed catalog seeded by `Catalog::seed`, ordered by diamonds.
pub fn default_packages() -> Vec<NewPackage> {
    vec![
        NewPackage::new(86, 0, 1.99, false),
        NewPackage::new(172, 12, 3.69, true),
        NewPackage::new(257, 25, 5.49, false),
        NewPackage::new(344, 32, 7.29, false),
        NewPackage::new(570, 60, 11.49, true),
        NewPackage::new(1156, 140, 22.99, false),
    ]
}
