pub mod settings;

pub use settings::{Controls, Device, Logger, Polling, Remote, Settings};
