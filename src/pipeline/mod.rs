pub mod digest;
pub mod ledger;
pub mod reconcile;
pub mod timeline;

pub use digest::render_digest;
pub use ledger::build_ledger;
pub use reconcile::apply_answers;
pub use timeline::classify_timeline;
