//! External service integrations.

pub mod wizzio_client {
    pub use crate::wizzio_client::*;
}
