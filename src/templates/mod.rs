pub mod assemble;
pub mod extract;
pub mod group;

pub use assemble::{assemble_request, validate_selection};
pub use extract::{extract_slots, scan_placeholders};
pub use group::{GroupedTemplate, Selection, TemplateCatalog};
