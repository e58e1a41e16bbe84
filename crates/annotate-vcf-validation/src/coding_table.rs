use std::collections::BTreeMap;
use std::str::FromStr;

use serde_yaml::Value;

use annotate_vcf_utils::error::ValidationError;

/// Key whose table applies to every contig not listed explicitly.
pub const DEFAULT_KEY: &str = "default";

/// Genetic code tables snpEff can translate with.
pub const KNOWN_CODON_TABLES: [&str; 25] = [
    "Alternative_Flatworm_Mitochondrial",
    "Alternative_Yeast_Nuclear",
    "Ascidian_Mitochondrial",
    "Bacterial_and_Plant_Plastid",
    "Blepharisma_Macronuclear",
    "Chlorophycean_Mitochondrial",
    "Ciliate_Nuclear",
    "Coelenterate",
    "Dasycladacean_Nuclear",
    "Echinoderm_Mitochondrial",
    "Euplotid_Nuclear",
    "Flatworm_Mitochondrial",
    "Hexamita_Nuclear",
    "Invertebrate_Mitochondrial",
    "Mitochondrial",
    "Mold_Mitochondrial",
    "Mycoplasma",
    "Protozoan_Mitochondrial",
    "Scenedesmus_obliquus_Mitochondrial",
    "Spiroplasma",
    "Standard",
    "Thraustochytrium_Mitochondrial",
    "Trematode_Mitochondrial",
    "Vertebrate_Mitochondrial",
    "Yeast_Mitochondrial",
];

#[must_use]
pub fn is_known_codon_table(name: &str) -> bool {
    KNOWN_CODON_TABLES.binary_search(&name).is_ok()
}

/// Contig name to codon table name, optionally with a `default` entry.
///
/// Parsing accepts any YAML mapping of scalars. Whether the names are known
/// tables, or every contig is covered, is decided by
/// [`check_contigs`](crate::check_contigs).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodingTable {
    entries: BTreeMap<String, String>,
}

impl CodingTable {
    /// Parse flow (`{CHROM1: Standard, default: Mycoplasma}`) or block style YAML.
    pub fn parse(text: &str) -> Result<Self, ValidationError> {
        let value: Value =
            serde_yaml::from_str(text).map_err(|e| ValidationError::MalformedCodingTable {
                reason: e.to_string(),
            })?;

        let mapping = match value {
            Value::Mapping(mapping) => mapping,
            Value::Null => {
                return Err(ValidationError::MalformedCodingTable {
                    reason: "empty coding table".to_string(),
                });
            }
            other => {
                return Err(ValidationError::MalformedCodingTable {
                    reason: format!("expected a mapping, found {}", kind_of(&other)),
                });
            }
        };

        let mut entries = BTreeMap::new();
        for (key, table) in mapping {
            let contig = scalar_to_string(&key).ok_or_else(|| {
                ValidationError::MalformedCodingTable {
                    reason: format!("contig names must be scalars, found {}", kind_of(&key)),
                }
            })?;
            let table = table_to_string(&table).ok_or_else(|| {
                ValidationError::MalformedCodingTable {
                    reason: format!(
                        "coding table for '{contig}' must be a scalar, found {}",
                        kind_of(&table)
                    ),
                }
            })?;
            entries.insert(contig, table);
        }

        if entries.is_empty() {
            return Err(ValidationError::MalformedCodingTable {
                reason: "empty coding table".to_string(),
            });
        }

        Ok(Self { entries })
    }

    #[must_use]
    pub fn default_table(&self) -> Option<&str> {
        self.entries.get(DEFAULT_KEY).map(String::as_str)
    }

    #[must_use]
    pub fn has_default(&self) -> bool {
        self.entries.contains_key(DEFAULT_KEY)
    }

    /// Explicit entry for `contig`, ignoring `default`.
    #[must_use]
    pub fn explicit(&self, contig: &str) -> Option<&str> {
        self.entries.get(contig).map(String::as_str)
    }

    /// Table snpEff should use for `contig`: explicit entry, else `default`.
    #[must_use]
    pub fn table_for(&self, contig: &str) -> Option<&str> {
        self.explicit(contig).or_else(|| self.default_table())
    }

    /// Every table name referenced, including the default.
    pub fn tables(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromStr for CodingTable {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CodingTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A bare `contig:` keeps its entry as `null`, which no codon table matches.
fn table_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some("null".to_string()),
        other => scalar_to_string(other),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
