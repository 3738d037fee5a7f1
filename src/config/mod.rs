mod settings;

pub use settings::{ApiConfig, DdnsConfig, GeneralConfig, Settings};
