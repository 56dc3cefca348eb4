//! Booking form wizard
//!
//! - Rules: per-field validation chains expressed as data
//! - Definition: step layout and the default booking form
//! - Wizard: step navigation, auto-persistence and submission
//! - Gateway: where validated bookings are sent
//! - Reference: booking reference tokens

pub mod definition;
pub mod gateway;
pub mod reference;
pub mod rules;
pub mod wizard;

pub use definition::{FieldSpec, FormDefinition, StepDefinition};
pub use gateway::{BookingGateway, SimulatedGateway};
pub use reference::generate_reference;
pub use rules::{CustomCheck, FieldRule, Pattern, Rule};
pub use wizard::FormWizard;
