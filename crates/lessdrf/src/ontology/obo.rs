//! OBO flat-file ontologies (PSI-MS, PRIDE CV).
//!
//! Only `[Term]` stanzas are read. `is_a` lines give the subclass
//! hierarchy; `relationship: part_of` lines are kept for lookups but not
//! followed by [`OboOntology::subclasses_of`].
//!
//! ```ignore
//! use lessdrf::ontology::OboOntology;
//!
//! let ms = OboOntology::load("psi-ms.obo.gz")?;
//! for child in ms.subclasses_of("MS:1000031", 1)? {
//!     println!("{}: {}", child.id, child.label);
//! }
//! ```

use std::collections::{HashMap, HashSet, VecDeque};
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::compression::read_file;
use crate::error::{Result, SdrfError};

use super::builder::SubclassSource;
use super::graph::{OntologyNode, OntologySnapshot};

/// One `[Term]` stanza.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OboTerm {
    pub id: String,
    pub name: Option<String>,
    pub is_a: Vec<String>,
    pub part_of: Vec<String>,
    pub obsolete: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stanza {
    Header,
    Term,
    Other,
}

/// Parsed OBO ontology with a parent→children index over `is_a`.
#[derive(Debug, Clone, Default)]
pub struct OboOntology {
    terms: HashMap<String, OboTerm>,
    /// Child ids per parent id, in file order.
    children: HashMap<String, Vec<String>>,
    snapshot: OntologySnapshot,
}

impl OboOntology {
    /// Parse OBO text from a reader.
    pub fn parse(reader: impl Read) -> Result<Self> {
        let reader = BufReader::new(reader);
        let mut ontology = OboOntology::default();

        let mut stanza = Stanza::Header;
        let mut current: Option<OboTerm> = None;

        for (line_no, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| SdrfError::Obo {
                line: line_no + 1,
                message: e.to_string(),
            })?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('!') {
                continue;
            }

            if line.starts_with('[') {
                if let Some(term) = current.take() {
                    ontology.add_term(term);
                }
                stanza = match line {
                    "[Term]" => Stanza::Term,
                    _ => Stanza::Other,
                };
                continue;
            }

            if stanza != Stanza::Term {
                continue;
            }

            let Some((key, value)) = line.split_once(':') else {
                return Err(SdrfError::Obo {
                    line: line_no + 1,
                    message: format!("expected 'key: value', found '{line}'"),
                });
            };
            let value = strip_trailing_comment(value.trim());

            if key == "id" {
                if let Some(term) = current.take() {
                    ontology.add_term(term);
                }
                current = Some(OboTerm {
                    id: value.to_string(),
                    ..Default::default()
                });
                continue;
            }

            let Some(term) = current.as_mut() else {
                return Err(SdrfError::Obo {
                    line: line_no + 1,
                    message: format!("'{key}' before the term id"),
                });
            };

            match key {
                "name" => term.name = Some(value.to_string()),
                "is_a" => {
                    if let Some(parent) = value.split_whitespace().next() {
                        term.is_a.push(parent.to_string());
                    }
                }
                "relationship" => {
                    let mut parts = value.split_whitespace();
                    if let (Some("part_of"), Some(target)) = (parts.next(), parts.next()) {
                        term.part_of.push(target.to_string());
                    }
                }
                "is_obsolete" => term.obsolete = value == "true",
                _ => {}
            }
        }

        if let Some(term) = current.take() {
            ontology.add_term(term);
        }

        ontology.snapshot = OntologySnapshot {
            source: "in-memory".to_string(),
            fingerprint: None,
            node_count: ontology.terms.len(),
            edge_count: ontology.children.values().map(Vec::len).sum(),
            loaded_at: chrono::Utc::now(),
        };
        Ok(ontology)
    }

    /// Load an OBO file, plain or gzipped.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = read_file(path)?;
        let mut ontology = Self::parse(file.contents.as_slice())?;
        ontology.snapshot.source = path.display().to_string();
        ontology.snapshot.fingerprint = Some(file.fingerprint);
        tracing::info!(path = %path.display(), terms = ontology.len(), "loaded OBO ontology");
        Ok(ontology)
    }

    fn add_term(&mut self, term: OboTerm) {
        if term.id.is_empty() {
            return;
        }
        for parent in &term.is_a {
            self.children
                .entry(parent.clone())
                .or_default()
                .push(term.id.clone());
        }
        if self.terms.insert(term.id.clone(), term).is_some() {
            tracing::warn!("duplicate OBO term id");
        }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn term(&self, id: &str) -> Option<&OboTerm> {
        self.terms.get(id)
    }

    /// All parsed terms, in no particular order.
    pub fn terms(&self) -> impl Iterator<Item = &OboTerm> {
        self.terms.values()
    }

    pub fn snapshot(&self) -> &OntologySnapshot {
        &self.snapshot
    }

    /// Subclasses of `term_id` up to `distance` `is_a` steps away.
    ///
    /// The term itself is not included. Obsolete and unnamed terms are
    /// skipped, along with everything beneath them.
    pub fn subclasses_of(&self, term_id: &str, distance: usize) -> Result<Vec<OntologyNode>> {
        if !self.terms.contains_key(term_id) {
            return Err(SdrfError::TermNotFound {
                term_id: term_id.to_string(),
            });
        }

        let mut found = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        seen.insert(term_id);
        let mut queue: VecDeque<(&str, usize)> = VecDeque::new();
        queue.push_back((term_id, 0));

        while let Some((id, depth)) = queue.pop_front() {
            if depth >= distance {
                continue;
            }
            for child_id in self.children.get(id).into_iter().flatten() {
                let Some(child) = self.terms.get(child_id) else {
                    continue;
                };
                let Some(name) = child.name.as_deref() else {
                    continue;
                };
                if child.obsolete || !seen.insert(child_id.as_str()) {
                    continue;
                }
                found.push(OntologyNode::new(child_id.clone(), name));
                queue.push_back((child_id.as_str(), depth + 1));
            }
        }

        Ok(found)
    }
}

impl SubclassSource for OboOntology {
    fn label(&self, id: &str) -> Result<&str> {
        self.terms
            .get(id)
            .and_then(|t| t.name.as_deref())
            .ok_or_else(|| SdrfError::TermNotFound {
                term_id: id.to_string(),
            })
    }

    fn direct_subclasses(&self, id: &str) -> Vec<OntologyNode> {
        self.subclasses_of(id, 1).unwrap_or_default()
    }
}

/// Drop a trailing `! comment`, which OBO allows after most values.
fn strip_trailing_comment(value: &str) -> &str {
    match value.find(" !") {
        Some(pos) if !value.starts_with('"') => value[..pos].trim_end(),
        _ => value,
    }
}
