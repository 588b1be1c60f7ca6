pub mod confirmation;
pub mod pricing;
pub mod receipt;
pub mod session;
pub mod validation;
pub mod wizard;

pub use session::{WizardSessions, WizardView};
pub use wizard::{BookingWizard, StayUpdate, WizardError, WizardExit, WizardStep};
