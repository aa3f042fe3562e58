use serde::Deserialize;

use crate::adapter::*;
use crate::errors::*;

fn default_report_end() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct Entry {
    name: String,
    pattern: String,
    #[serde(default)]
    max_errors: usize,
    #[serde(default)]
    min_overlap: Option<usize>,
    #[serde(default = "default_report_end")]
    report_end: bool,
    #[serde(default)]
    rightmost: bool,
}

#[derive(Debug, Deserialize)]
struct SetFile {
    name: String,
    adapters: Vec<Entry>,
}

/// An adapter definition with its constructed matcher.
#[derive(Clone, Debug)]
pub struct NamedAdapter {
    name: String,
    pattern: Vec<u8>,
    adapter: Adapter,
}

impl NamedAdapter {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &[u8] {
        &self.pattern
    }

    pub fn adapter(&self) -> &Adapter {
        &self.adapter
    }
}

/// A named set of adapter definitions loaded from YAML.
///
/// ```yaml
/// name: trimming
/// adapters:
///     - name: truseq
///       pattern: "AGATCGGAAGAGC"
///       max_errors: 1
///     - name: rev_anchor
///       pattern: "CAGAGC"
///       rightmost: true
///       report_end: false
///       min_overlap: 4
/// ```
///
/// Omitted options default to an exact leftmost matcher reporting the
/// match end.
#[derive(Clone, Debug)]
pub struct AdapterSet {
    name: String,
    adapters: Vec<NamedAdapter>,
}

impl AdapterSet {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let parsed: SetFile = serde_yaml::from_str(yaml).map_err(|e| Error::ParseAdapters {
            adapters: yaml.to_owned(),
            source: Box::new(e),
        })?;

        let mut adapters = Vec::with_capacity(parsed.adapters.len());

        for entry in parsed.adapters {
            let adapter = Adapter::new(
                &entry.pattern,
                AdapterOpts {
                    max_errors: entry.max_errors,
                    min_overlap: entry.min_overlap,
                    report_end: entry.report_end,
                    rightmost: entry.rightmost,
                },
            )?;

            adapters.push(NamedAdapter {
                name: entry.name,
                pattern: entry.pattern.into_bytes(),
                adapter,
            });
        }

        Ok(Self {
            name: parsed.name,
            adapters,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<NamedAdapter> {
        self.adapters.iter()
    }

    pub fn get(&self, name: &str) -> Option<&NamedAdapter> {
        self.adapters.iter().find(|a| a.name == name)
    }
}
