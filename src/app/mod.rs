pub mod controller;
pub mod interaction;
pub mod orchestrator;

#[cfg(test)]
pub(crate) mod test_support;

pub use controller::AppController;
pub use interaction::InteractionController;
pub use orchestrator::LookupOrchestrator;
