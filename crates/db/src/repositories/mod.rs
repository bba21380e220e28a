pub mod draft_repo;
pub mod proposal_repo;
pub mod stripe_event_repo;
pub mod usage_repo;

pub use draft_repo::DraftRepo;
pub use proposal_repo::ProposalRepo;
pub use stripe_event_repo::StripeEventRepo;
pub use usage_repo::UsageRepo;
