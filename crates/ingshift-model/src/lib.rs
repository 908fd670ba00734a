//! Shared data model for ingshift
//!
//! Route snapshots extracted from a cluster, the compatibility vocabulary
//! used by the classifier and the phase deriver, and the generated artifact
//! records emitted by the synthesizers.
//!
//! # Example
//!
//! ```
//! use ingshift_model::{Route, Target};
//!
//! let route = Route::new("shop", "checkout")
//!     .with_host("shop.example.com")
//!     .with_annotation("nginx.ingress.kubernetes.io/ssl-redirect", "true");
//!
//! assert_eq!(route.nginx("ssl-redirect"), Some("true"));
//! assert_eq!("gateway-api".parse::<Target>().unwrap(), Target::GatewayApi);
//! ```

pub mod artifact;
pub mod error;
pub mod hash;
pub mod route;
pub mod status;
pub mod target;

pub use artifact::{ArtifactCategory, GeneratedArtifact};
pub use error::{ModelError, Result};
pub use hash::ContentHash;
pub use route::{ComplexityTier, PathRule, Route, NGINX_PREFIX};
pub use status::{CompatibilityStatus, OverallStatus};
pub use target::Target;
