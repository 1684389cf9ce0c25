//! Store fixtures: initial state plus expected actions, loaded from JSON or YAML

use std::fmt::Debug;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::store::MockStore;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoreFixture<S, A> {
    pub state: S,
    #[serde(default = "Vec::new")]
    pub expected: Vec<A>,
}

impl<S, A> StoreFixture<S, A>
where
    S: DeserializeOwned,
    A: DeserializeOwned,
{
    pub fn from_json_str(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn from_yaml_str(source: &str) -> Result<Self> {
        serde_yaml::from_str(source).map_err(|e| Error::Fixture(format!("Invalid YAML fixture: {}", e)))
    }

    /// Load by extension: `.json`, `.yaml` or `.yml`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        let parse: fn(&str) -> Result<Self> = match ext.as_deref() {
            Some("json") => Self::from_json_str,
            Some("yaml" | "yml") => Self::from_yaml_str,
            _ => {
                return Err(Error::invalid(format!(
                    "fixture {} should have a .json, .yaml or .yml extension",
                    path.display()
                )))
            }
        };
        let source = std::fs::read_to_string(path)
            .map_err(|e| Error::Fixture(format!("Failed to read {}: {}", path.display(), e)))?;
        tracing::debug!(path = %path.display(), "loading store fixture");
        parse(&source)
    }
}

impl<S, A> StoreFixture<S, A>
where
    S: Clone + 'static,
    A: PartialEq + Debug + 'static,
{
    pub fn into_store(self) -> MockStore<S, A> {
        MockStore::new(self.state, self.expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Clone, Debug, PartialEq, Deserialize)]
    struct Counter {
        count: u32,
    }

    #[derive(Clone, Debug, PartialEq, Deserialize)]
    #[serde(tag = "type")]
    enum CounterAction {
        Increment,
        Set { value: u32 },
    }

    fn temp_file(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("dispatch-testkit-{}-{}", std::process::id(), name));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_json_and_yaml_agree() {
        let json: StoreFixture<Counter, CounterAction> = StoreFixture::from_json_str(
            r#"{"state": {"count": 2}, "expected": [{"type": "Increment"}, {"type": "Set", "value": 9}]}"#,
        )
        .unwrap();
        let yaml: StoreFixture<Counter, CounterAction> = StoreFixture::from_yaml_str(
            "state:\n  count: 2\nexpected:\n  - type: Increment\n  - type: Set\n    value: 9\n",
        )
        .unwrap();
        assert_eq!(json, yaml);
        assert_eq!(json.expected.len(), 2);
    }

    #[test]
    fn test_missing_expected_defaults_to_empty() {
        let fixture: StoreFixture<Counter, CounterAction> =
            StoreFixture::from_json_str(r#"{"state": {"count": 0}}"#).unwrap();
        assert!(fixture.into_store().is_drained());
    }

    #[test]
    fn test_from_path_by_extension() {
        let path = temp_file("counter.yml", "state: {count: 1}\nexpected: [{type: Increment}]\n");
        let store = StoreFixture::<Counter, CounterAction>::from_path(&path)
            .unwrap()
            .into_store();
        std::fs::remove_file(&path).ok();

        assert_eq!(store.get_state(), Counter { count: 1 });
        store.dispatch(CounterAction::Increment);
        store.assert_passed();
    }

    #[test]
    fn test_from_path_errors() {
        let err = StoreFixture::<Counter, CounterAction>::from_path("fixture.toml").unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));

        let err = StoreFixture::<Counter, CounterAction>::from_path("/nonexistent/fixture.json").unwrap_err();
        assert!(matches!(err, Error::Fixture(_)));

        let err = StoreFixture::<Counter, CounterAction>::from_yaml_str("state: [").unwrap_err();
        assert!(matches!(err, Error::Fixture(_)));
    }
}
