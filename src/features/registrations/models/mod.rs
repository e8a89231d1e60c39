mod registration;

pub use registration::{Registration, RegistrationPatch};
