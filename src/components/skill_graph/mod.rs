mod component;
mod config;
mod error;
mod inference;
mod interaction;
mod layout;
mod model;
mod normalize;
mod palette;
mod render;
mod state;
mod types;

pub use component::SkillGraphCanvas;
pub use config::DEFAULT_CATEGORY;
pub use error::GraphError;
pub use palette::Palette;
pub use types::{GraphStatus, SelectedNode, SkillRecord};
