pub mod auth_service;
pub mod contact_service;
pub mod email_service;
pub mod observation_service;
pub mod ocean_service;
pub mod species_service;

pub use email_service::{EmailMessage, EmailSender};
pub use species_service::ModelClient;
