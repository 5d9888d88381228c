pub mod catalog;
pub mod engine;
pub mod errors;
pub mod locale;
pub mod models;
pub mod path;
pub mod priority;
pub mod quality;
pub mod scorer;
pub mod tags;

pub use catalog::{CatalogCache, VariantCatalog};
pub use engine::{Negotiator, RequestFacts};
pub use errors::CatalogError;
pub use models::{Decision, RewritePlan, VariantInfo, VariantTraits, WatchHook};
pub use tags::{SubstringClassifier, TagSet, UserAgentClassifier};
