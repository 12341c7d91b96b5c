mod router;
mod templates;

pub use router::router;
pub use templates::{Template, templates};
