//! Rendering pipeline: text metrics, layout, draw instructions and the
//! backends that paint them.

pub mod layout;
pub mod metrics;
pub mod paint;

// Vector PDF through printpdf's builtin fonts
#[cfg(feature = "pdf")]
pub mod pdf;

// Print-styled HTML through a minijinja template
#[cfg(feature = "html")]
pub mod html;
