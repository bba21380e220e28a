pub mod draft;
pub mod proposal;
pub mod stripe_event;
pub mod usage;
