//! Type definitions for the sleep score service

pub mod profile;
pub mod report;

pub use profile::{BmiCategory, Gender, HealthProfile, SleepDisorder};
pub use report::{SleepCategory, SleepReport};
