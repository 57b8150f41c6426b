//! Conformance test fixture runner
//!
//! Loads YAML fixtures and runs them against the amroute engine. A fixture
//! carries a routing config in the production format plus label sets and the
//! targets they must resolve to:
//!
//! ```yaml
//! name: short-circuit
//! description: first matching sibling wins
//! config:
//!   routes:
//!     - { send_to: a, match: { x: "1" } }
//!     - { send_to: b, match: { x: "1" } }
//! cases:
//!   - name: only a
//!     labels: { x: "1" }
//!     expect: [a]
//! ```

use amroute::prelude::*;
use serde::Deserialize;
use std::collections::BTreeMap;

/// A complete test fixture
#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub config: RoutingConfig,
    #[serde(default)]
    pub cases: Vec<TestCase>,
    /// The config must fail validation.
    #[serde(default)]
    pub expect_error: bool,
}

/// Test case
#[derive(Debug, Deserialize)]
pub struct TestCase {
    pub name: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    /// Expected targets, in match order.
    pub expect: Vec<String>,
}

impl TestCase {
    /// Build a `LabelSet` from this case's label map
    pub fn build_labels(&self) -> LabelSet {
        self.labels.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Runner
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of running a single test case
#[derive(Debug)]
pub struct CaseResult {
    pub case_name: String,
    pub passed: bool,
    pub expected: Vec<String>,
    pub actual: Vec<String>,
}

impl Fixture {
    /// Parse a fixture from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Parse multiple fixtures from a YAML file with `---` separators
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, serde_yaml::Error> {
        let mut fixtures = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(yaml) {
            fixtures.push(Self::deserialize(doc)?);
        }
        Ok(fixtures)
    }

    /// Run all test cases and return results
    ///
    /// # Errors
    ///
    /// Returns the config error if the fixture's config does not build.
    pub fn run(&self) -> Result<Vec<CaseResult>, ConfigError> {
        let routes = self.config.build()?;
        Ok(self
            .cases
            .iter()
            .map(|case| {
                let actual = crate::targets(&routes, &case.build_labels());
                CaseResult {
                    case_name: case.name.clone(),
                    passed: actual == case.expect,
                    expected: case.expect.clone(),
                    actual,
                }
            })
            .collect())
    }

    /// Run all test cases and panic on first failure
    pub fn run_and_assert(&self) {
        match (self.run(), self.expect_error) {
            (Ok(results), false) => {
                for result in results {
                    assert!(
                        result.passed,
                        "Fixture '{}' case '{}' failed: expected {:?}, got {:?}",
                        self.name, result.case_name, result.expected, result.actual
                    );
                }
            }
            (Err(_), true) => {}
            (Ok(_), true) => panic!("Fixture '{}' expected a config error", self.name),
            (Err(e), false) => panic!("Fixture '{}' config failed: {e}", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_run_inline_fixture() {
        let fixture = Fixture::from_yaml(
            r#"
name: inline
config:
  routes:
    - { send_to: a, match: { x: "1" } }
cases:
  - name: hit
    labels: { x: "1" }
    expect: [a]
  - name: miss
    labels: { x: "2" }
    expect: [""]
"#,
        )
        .unwrap();
        let results = fixture.run().unwrap();
        assert!(results.iter().all(|r| r.passed), "{results:?}");
    }

    #[test]
    fn multi_document_parse() {
        let fixtures =
            Fixture::from_yaml_multi("name: a\nconfig: {}\n---\nname: b\nconfig: {}\n").unwrap();
        assert_eq!(fixtures.len(), 2);
        assert_eq!(fixtures[1].name, "b");
    }

    #[test]
    fn expect_error_fixture_passes_on_invalid_config() {
        let fixture = Fixture::from_yaml(
            "name: bad\nexpect_error: true\nconfig:\n  routes:\n    - match_re: { a: \"[\" }\n",
        )
        .unwrap();
        fixture.run_and_assert();
    }
}
