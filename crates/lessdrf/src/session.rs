//! Per-user wizard state around the shared ontology repository.

use std::io::Write;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::config::SdrfConfig;
use crate::error::{Result, SdrfError};
use crate::export::export_sdrf;
use crate::mapping::{map_metadata_column, MappingOutcome};
use crate::ontology::{OntologyRepository, SubclassTree, TreeUiNode};
use crate::table::fill::{self, ColumnEditor, FillStrategy};
use crate::table::{write_modifications, ModificationParameter, WorkingTable};
use crate::validation::{check_table, OrganismSynonyms, TableCheck};
use crate::vocabulary::{PermittedVocabulary, VocabularyStore};

/// One user's working table plus handles to the shared, read-only data.
///
/// The table belongs to this session alone; the repository and vocabularies
/// are shared between sessions.
#[derive(Debug)]
pub struct Session {
    repository: Arc<OntologyRepository>,
    vocabularies: Arc<VocabularyStore>,
    synonyms: OrganismSynonyms,
    config: SdrfConfig,
    table: WorkingTable,
}

impl Session {
    pub fn new(repository: Arc<OntologyRepository>, table: WorkingTable) -> Self {
        Self {
            repository,
            vocabularies: Arc::new(VocabularyStore::new()),
            synonyms: OrganismSynonyms::standard(),
            config: SdrfConfig::default(),
            table,
        }
    }

    pub fn with_vocabularies(mut self, vocabularies: Arc<VocabularyStore>) -> Self {
        self.vocabularies = vocabularies;
        self
    }

    pub fn with_config(mut self, config: SdrfConfig) -> Self {
        self.config = config;
        self
    }

    /// Start from an uploaded table, enforcing the sample limit.
    pub fn from_upload(
        repository: Arc<OntologyRepository>,
        table: WorkingTable,
        config: SdrfConfig,
    ) -> Result<Self> {
        if table.row_count() > config.max_uploaded_samples {
            return Err(SdrfError::LimitExceeded {
                count: table.row_count(),
                limit: config.max_uploaded_samples,
            });
        }
        Ok(Self::new(repository, table).with_config(config))
    }

    pub fn table(&self) -> &WorkingTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut WorkingTable {
        &mut self.table
    }

    pub fn into_table(self) -> WorkingTable {
        self.table
    }

    pub fn config(&self) -> &SdrfConfig {
        &self.config
    }

    /// Subclass tree for a column's picker.
    pub fn term_tree(&self, ontology: &str, root_id: &str, root_label: &str) -> Result<Arc<SubclassTree>> {
        self.repository.subclass_tree(ontology, root_id, root_label)
    }

    /// Tree-select nodes for a column's picker.
    pub fn term_tree_nodes(&self, ontology: &str, root_id: &str, root_label: &str) -> Result<Vec<TreeUiNode>> {
        Ok(self.term_tree(ontology, root_id, root_label)?.to_ui_nodes())
    }

    /// Permitted vocabulary for a column taken from an ontology subtree.
    pub fn term_vocabulary(&self, ontology: &str, root_id: &str, root_label: &str) -> Result<PermittedVocabulary> {
        let list = self.repository.term_list(ontology, root_id, root_label)?;
        Ok(PermittedVocabulary::from_term_list(&list))
    }

    /// Apply an already decided strategy to a column.
    pub fn annotate(&mut self, column: &str, strategy: &FillStrategy) -> Result<Vec<ColumnEditor>> {
        fill::apply(&mut self.table, column, strategy)
    }

    /// Decide how to fill a column from its permitted values and apply it.
    pub fn fill_column(
        &mut self,
        column: &str,
        permitted: Option<&[String]>,
        allow_multiple_per_row: bool,
    ) -> Result<Vec<ColumnEditor>> {
        fill::decide_and_apply(&mut self.table, column, permitted, allow_multiple_per_row)
    }

    /// Fill a column from terms picked in the tree or autocomplete widgets.
    pub fn fill_from_selection<S: AsRef<str>>(
        &mut self,
        column: &str,
        selected: &[S],
        expected: usize,
        within_one_row: bool,
    ) -> Result<Vec<ColumnEditor>> {
        let strategy = fill::strategy_from_selection(selected, expected, within_one_row)?;
        self.annotate(column, &strategy)
    }

    /// Write edited cells back through an editor.
    pub fn accept_edits(&mut self, editor: &ColumnEditor, edited: Vec<Option<String>>) -> Result<()> {
        editor.accept(&mut self.table, edited)
    }

    /// Fill `comment[data file]` from a pasted list of names.
    pub fn assign_data_files(&mut self, names: &[String]) -> Result<()> {
        self.table.assign_data_files(names, self.config.max_data_files)
    }

    /// Duplicate rows so each data file gets one row per label.
    pub fn assign_labels(&mut self, assignments: &IndexMap<String, Vec<String>>) -> Result<()> {
        self.table.assign_labels(assignments)
    }

    /// Write the modification parameters, one column each.
    pub fn set_modifications(&mut self, modifications: &[ModificationParameter]) -> Result<Vec<String>> {
        write_modifications(&mut self.table, modifications)
    }

    pub fn map_metadata(
        &mut self,
        sdrf_column: &str,
        metadata: &WorkingTable,
        metadata_column: &str,
    ) -> Result<MappingOutcome> {
        map_metadata_column(
            &mut self.table,
            sdrf_column,
            metadata,
            metadata_column,
            &self.vocabularies,
            &self.synonyms,
        )
    }

    /// Check the given columns against the loaded vocabularies.
    pub fn check<S: AsRef<str>>(&self, columns: &[S]) -> Result<TableCheck> {
        check_table(&self.table, columns, &self.vocabularies)
    }

    pub fn export(&self, writer: impl Write) -> Result<()> {
        export_sdrf(&self.table, &self.config.export, writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ontology::{LoadedOntology, OntologyEdge, OntologyGraphIndex, OntologyNode};

    fn repository() -> Arc<OntologyRepository> {
        let index = OntologyGraphIndex::from_parts(
            [
                OntologyNode::new("EFO:0000408", "disease"),
                OntologyNode::new("EFO:1", "cancer"),
                OntologyNode::new("EFO:2", "melanoma"),
            ],
            vec![
                OntologyEdge {
                    subject: "EFO:1".into(),
                    predicate: "is_a".into(),
                    object: "EFO:0000408".into(),
                },
                OntologyEdge {
                    subject: "EFO:2".into(),
                    predicate: "is_a".into(),
                    object: "EFO:1".into(),
                },
            ],
        );
        let mut repo = OntologyRepository::default();
        repo.insert("efo", LoadedOntology::Graph(index));
        Arc::new(repo)
    }

    fn table() -> WorkingTable {
        let mut table = WorkingTable::new(["source name", "characteristics[disease]"]);
        table.resize_rows(2);
        table
    }

    #[test]
    fn test_sessions_share_repository_not_table() {
        let repo = repository();
        let mut a = Session::new(Arc::clone(&repo), table());
        let b = Session::new(Arc::clone(&repo), table());

        a.fill_from_selection("characteristics[disease]", &["disease,cancer,melanoma"], 1, false)
            .unwrap();
        assert_eq!(a.table().cell(1, "characteristics[disease]"), Some("melanoma"));
        assert_eq!(b.table().cell(1, "characteristics[disease]"), None);

        a.term_tree("efo", "EFO:0000408", "disease").unwrap();
        assert_eq!(repo.cached_trees(), 1);
    }

    #[test]
    fn test_vocabulary_and_check() {
        let repo = repository();
        let mut session = Session::new(repo, table());
        let vocabulary = session.term_vocabulary("efo", "EFO:0000408", "disease").unwrap();
        assert_eq!(vocabulary.len(), 3);

        let permitted: Vec<String> = vocabulary.iter().map(str::to_string).collect();
        let editors = session
            .fill_column("characteristics[disease]", Some(&permitted), false)
            .unwrap();
        session
            .accept_edits(&editors[0], vec![Some("cancer".into()), Some("NA".into())])
            .unwrap();

        let mut store = VocabularyStore::new();
        store.insert("all_disease_elements", vocabulary);
        let session = session.with_vocabularies(Arc::new(store));
        let check = session.check(&["characteristics[disease]"]).unwrap();
        // fixed-list columns offer "NA", which no ontology vocabulary holds
        assert_eq!(check.columns_to_clear(), vec!["characteristics[disease]"]);
    }

    #[test]
    fn test_picked_terms_always_pass_check() {
        let repo = repository();
        let mut session = Session::new(repo, table());
        let vocabulary = session.term_vocabulary("efo", "EFO:0000408", "disease").unwrap();
        let mut store = VocabularyStore::new();
        store.insert("all_disease_elements", vocabulary);
        let mut session = session.with_vocabularies(Arc::new(store));

        let editors = session
            .fill_from_selection("characteristics[disease]", &["disease,cancer", "disease,cancer,melanoma"], 2, false)
            .unwrap();
        let options = editors[0].options.clone().unwrap();
        assert!(!options.iter().any(|o| o == "NA"));

        for option in &options {
            session
                .accept_edits(&editors[0], vec![Some(option.clone()), Some("melanoma".into())])
                .unwrap();
            let check = session.check(&["characteristics[disease]"]).unwrap();
            assert!(check.is_valid(), "{option:?} failed the check");
        }
    }

    #[test]
    fn test_upload_limit() {
        let mut big = table();
        big.resize_rows(3);
        let config = SdrfConfig {
            max_uploaded_samples: 2,
            ..SdrfConfig::default()
        };
        let err = Session::from_upload(repository(), big, config).unwrap_err();
        assert!(matches!(err, SdrfError::LimitExceeded { count: 3, limit: 2 }));
    }

    #[test]
    fn test_labels_and_modifications_exported() {
        use crate::table::{
            ModificationPosition, ModificationType, DATA_FILE_COLUMN, LABEL_COLUMN,
            MODIFICATION_COLUMN,
        };

        let mut session = Session::new(repository(), WorkingTable::new(["source name", DATA_FILE_COLUMN]));
        session
            .assign_data_files(&["a.raw".to_string(), "b.raw".to_string()])
            .unwrap();
        session.table_mut().set_constant("source name", "s");

        let mut labels = IndexMap::new();
        labels.insert("ALL".to_string(), vec!["TMT126".to_string(), "TMT127".to_string()]);
        session.assign_labels(&labels).unwrap();
        assert_eq!(session.table().row_count(), 4);

        let oxidation = ModificationParameter::known(
            "Oxidation",
            "NT=Oxidation;AC=UNIMOD:35",
            ModificationType::Variable,
            ModificationPosition::Anywhere,
            &["M"],
        )
        .unwrap();
        let columns = session
            .set_modifications(&[oxidation.clone(), oxidation])
            .unwrap();
        assert_eq!(columns.len(), 2);

        let mut out = Vec::new();
        session.export(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(header.matches(MODIFICATION_COLUMN).count(), 2);
        assert!(!header.contains("]_1"));
        assert!(header.contains(LABEL_COLUMN));
        assert_eq!(text.lines().count(), 5);
    }

    #[test]
    fn test_export_uses_config() {
        let mut session = Session::new(repository(), table());
        session.table_mut().set_constant("source name", "s");
        let mut out = Vec::new();
        session.export(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.lines().next().unwrap().ends_with("comment[tool metadata]"));
    }
}
