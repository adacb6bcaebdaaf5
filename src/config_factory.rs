//! Loading entry points: parse a string, load a file, or bridge any
//! serializable value through its JSON encoding into a document. The factory
//! carries the include loader handed to every parse; by default includes name
//! files on disk, loaded relative to the working directory.

use std::fs;

use serde::Serialize;
use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::parser::{self, IncludeLoader};
use crate::value::Root;

/// Default include loader. The quoted path names a file, which is parsed
/// with this same loader so nested includes keep working.
fn default_include_loader(path: &str) -> Result<Root> {
    let text = fs::read_to_string(path)?;
    parser::parse(&text, Some(&default_include_loader))
}

pub struct ConfigFactory<'a> {
    loader: Option<&'a IncludeLoader>,
}

impl<'a> ConfigFactory<'a> {
    pub fn new() -> ConfigFactory<'a> {
        ConfigFactory {
            loader: Some(&default_include_loader),
        }
    }

    /// A factory that rejects `include` directives.
    pub fn without_includes() -> ConfigFactory<'a> {
        ConfigFactory { loader: None }
    }

    pub fn with_include_loader(loader: &'a IncludeLoader) -> ConfigFactory<'a> {
        ConfigFactory { loader: Some(loader) }
    }

    pub fn parse_str(&self, text: &str) -> Result<Config> {
        parser::parse(text, self.loader).map(Config::from_root)
    }

    pub fn load_file(&self, path: &str) -> Result<Config> {
        debug!(path = %path, "loading configuration file");
        let text = fs::read_to_string(path)?;
        self.parse_str(&text)
    }

    /// Serialize `value` to JSON and parse the result; the configuration
    /// language is a superset of JSON, so any tree of maps, sequences and
    /// scalars becomes a document.
    pub fn from_json<T: Serialize>(&self, value: &T) -> Result<Config> {
        let text = serde_json::to_string(value)?;
        self.parse_str(&text)
    }
}

impl Default for ConfigFactory<'_> {
    fn default() -> Self {
        ConfigFactory::new()
    }
}

/// Parse a configuration string with the default file based include loader.
pub fn parse_string(text: &str) -> Result<Config> {
    ConfigFactory::new().parse_str(text)
}

/// Read and parse a configuration file.
pub fn load_config(path: &str) -> Result<Config> {
    ConfigFactory::new().load_file(path)
}

/// Build a configuration from any serializable value via its JSON form.
pub fn from_object<T: Serialize>(value: &T) -> Result<Config> {
    ConfigFactory::new().from_json(value)
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn parses_strings() {
        let config = parse_string("a { b = 1 }").unwrap();
        assert_eq!(config.get_int32("a.b").unwrap(), Some(1));
    }

    #[test]
    fn bridges_json_objects() {
        let value = serde_json::json!({
            "server": { "host": "localhost", "port": 8080 },
            "tags": ["a", "b"],
            "debug": true,
            "nothing": null
        });
        let config = from_object(&value).unwrap();
        assert_eq!(config.get_string("server.host").unwrap(), Some("localhost".to_string()));
        assert_eq!(config.get_int32("server.port").unwrap(), Some(8080));
        assert_eq!(
            config.get_string_list("tags").unwrap(),
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(config.get_boolean("debug").unwrap(), Some(true));
        // a JSON null reads as the collapsed empty string
        assert_eq!(config.get_string("nothing").unwrap(), Some(String::new()));
    }

    #[test]
    fn factory_without_includes_rejects_directives() {
        let result = ConfigFactory::without_includes().parse_str("include \"other.conf\"");
        assert!(result.is_err());
    }

    #[test]
    fn loads_files_and_their_includes() {
        let dir = std::env::temp_dir();
        let included = dir.join(format!("hoconfig_factory_included_{}.conf", std::process::id()));
        let main = dir.join(format!("hoconfig_factory_main_{}.conf", std::process::id()));

        fs::write(&included, "from.include = 1\nshared = included").unwrap();
        fs::write(
            &main,
            format!("shared = local\ninclude \"{}\"", included.display()),
        )
        .unwrap();

        let config = load_config(main.to_str().unwrap()).unwrap();
        assert_eq!(config.get_int32("from.include").unwrap(), Some(1));
        assert_eq!(config.get_string("shared").unwrap(), Some("local".to_string()));

        fs::remove_file(&included).ok();
        fs::remove_file(&main).ok();
    }

    #[test]
    fn missing_files_fail() {
        assert!(load_config("/no/such/file.conf").is_err());
    }
}
