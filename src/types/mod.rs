pub mod forms;
pub mod overview;

pub use forms::{AppointmentForm, CredentialsForm, MedicationForm, PetForm};
pub use overview::PetOverview;
