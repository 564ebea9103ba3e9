//! Text catalogs: reading `.po` files, converting them to JSON message maps,
//! looking translations up and preparing markup strings for extraction.

pub mod json;
pub mod lookup;
pub mod po;
pub mod template;

pub use lookup::{CatalogLookup, ModuleResolver, PoCatalogs, po_file};
pub use po::{PoCatalog, PoEntry};
pub use template::CatalogTemplate;
