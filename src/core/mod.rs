pub mod histogram;
pub mod layers;
pub mod quantity;
pub mod selection;
