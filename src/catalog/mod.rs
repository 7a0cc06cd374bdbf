mod builder;
mod models;

pub use builder::{BuildError, CatalogBuilder};
pub use models::{AlbumKind, ArtistCredit, Catalog, CatalogSource, Track};
