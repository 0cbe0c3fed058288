pub mod asset;
pub mod config;
pub mod error;
pub mod event;
pub mod features;
pub mod series;

pub use asset::AssetConfig;
pub use config::{load_dotenv, AnalysisConfig};
pub use error::*;
pub use event::*;
pub use features::*;
pub use series::*;
