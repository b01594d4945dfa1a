pub mod entry;
pub mod recipe;

pub use entry::{CatalogEntry, RecipeCatalog, RecipeSettings};
pub use recipe::{Recipe, RecipeId};
