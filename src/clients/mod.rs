pub mod gold;
pub mod names;
pub mod rarity;
