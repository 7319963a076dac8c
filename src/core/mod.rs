// Domain-layer modules and shared errors/models
pub mod forwarder {
    pub use crate::forwarder::*;
}

pub mod field_mapping {
    pub use crate::field_mapping::*;
}

pub mod signing {
    pub use crate::signing::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod errors {
    pub use crate::errors::*;
}
