// Aggregation pipeline core: canonical identity, seen-set dedup,
// relevance classification, ranking, archive, digest, and the run
// orchestrator that ties the connectors and channels together.

pub mod aggregate;
pub mod archive;
pub mod classify;
pub mod dashboard;
pub mod digest;
pub mod identity;
pub mod rank;
pub mod run;
pub mod seen;

pub use aggregate::{AggregateOutcome, Aggregator, RunStats};
pub use archive::{Archive, ArchiveStore};
pub use classify::Classifier;
pub use identity::canonicalize;
pub use rank::rank_and_trim;
pub use run::ScoutRun;
pub use seen::{SeenSet, SeenStore};
