pub mod form_controller;
pub mod form_state;

pub use form_controller::{FormController, OperationReport, Outcome, RawFields};
pub use form_state::FormState;
