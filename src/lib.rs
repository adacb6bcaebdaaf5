//! HOCON style configuration for Rust applications.
//!
//! A parser and in-memory document model for a human friendly superset of
//! JSON: dotted key paths, unquoted and triple quoted text, comments, file
//! inclusion, `${path}` substitutions with optional environment fallback,
//! additive object merging across duplicate keys, and `+=` array appends.
//! On top of the document engine sits a typed facade with dotted path
//! getters, duration and byte size units, layered document fallbacks and a
//! serde deserializer.
//!
//! ```
//! use std::time::Duration;
//!
//! let config = hoconfig::parse_string(r#"
//! server {
//!   host = localhost
//!   port = 8080
//! }
//! server.timeout = 30s
//! "#).unwrap();
//!
//! assert_eq!(config.get_string("server.host").unwrap(), Some("localhost".to_string()));
//! assert_eq!(config.get_int32("server.port").unwrap(), Some(8080));
//! assert_eq!(config.get_time_duration("server.timeout").unwrap(), Some(Duration::from_secs(30)));
//! ```

pub mod config;
pub mod config_factory;
mod de;
mod duration;
mod error;
mod mem;
mod parser;
mod resolve;
mod tokenizer;
mod value;

pub use config::Config;
pub use config_factory::{from_object, load_config, parse_string, ConfigFactory};
pub use de::{from_config, from_str};
pub use error::{Error, Result};
pub use parser::{parse, IncludeLoader};
pub use value::{ObjectRef, Root, Substitution, ValueId, ValueRef};
