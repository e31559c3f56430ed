//! Index implementations for vector search.

mod arena;
pub mod brute_force;
pub mod builder;
pub mod filter;
pub mod stop_condition;
pub mod traits;

pub use brute_force::BruteForceIndex;
pub use builder::BruteForceIndexBuilder;
pub use filter::{AcceptAll, AllowList, LabelFilter};
pub use stop_condition::{EpsilonSearchStopCondition, SearchStopCondition};
pub use traits::{FurthestFirst, KnnIndex, Neighbor};
