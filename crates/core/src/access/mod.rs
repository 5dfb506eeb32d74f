mod error;
mod http_mapping;
mod service;
mod traits;
mod types;

pub use error::{AccessError, Result};
pub use http_mapping::access_error_to_status_code;
pub use service::AccessService;
pub use traits::{expect_type_tag, Entity, EntityStore, TypeTagged, Validate};
pub use types::{Audit, ScanMarker, ScanPage};
