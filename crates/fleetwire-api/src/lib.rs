// fleetwire-api: HTTP clients for the fleet enrollment service and release feeds.

pub mod enroll;
pub mod error;
pub mod releases;
pub mod transport;

pub use enroll::{EnrollClient, MeshJoin};
pub use error::Error;
pub use releases::{ReleaseAsset, ReleaseClient};
pub use transport::{TlsMode, TransportConfig};
