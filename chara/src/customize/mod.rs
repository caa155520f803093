//! Character appearance customization: the option catalog per clan and
//! gender, and the query operations over it.

mod builder;
mod registry;
mod set;
mod types;

pub use registry::{CustomName, CustomizeRegistry, NameTable};
pub use set::CustomizationSet;
pub use types::{
    Clan, CustomizeData, CustomizeFlags, CustomizeIndex, CustomizeValue, Gender, MenuType, Race,
    NUM_INDICES,
};
