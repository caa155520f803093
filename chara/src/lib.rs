//! Read-only access to Final Fantasy XIV character customization data.
//!
//! The crate reads sqpack archives directly from a game installation,
//! decodes the excel sheets and the shared color table behind the character
//! creator, and exposes the result as one queryable catalog per clan and
//! gender ([`customize::CustomizeRegistry`]).

pub mod cmp;
pub mod customize;
pub mod error;
pub mod excel;
pub mod pack;
pub mod sheets;
