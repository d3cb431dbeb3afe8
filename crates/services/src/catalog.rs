use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use quiz_core::model::{Section, SectionName, SectionSource};
use storage::repository::{LineRepository, SectionIndex, SectionIndexRepository, Storage};

use crate::error::CatalogError;
use crate::logging::LogContext;

/// Name-ordered set of loaded sections, mirrored to the section index.
///
/// Every structural change rewrites the index before the in-memory map is
/// touched, so a failed read, validation or write leaves the catalog as it was.
pub struct SectionCatalog {
    sections: BTreeMap<SectionName, Section>,
    index: Arc<dyn SectionIndexRepository>,
    lines: Arc<dyn LineRepository>,
    log: LogContext,
}

impl SectionCatalog {
    /// Load every section listed in the stored index.
    ///
    /// Entries that are malformed, whose files cannot be read or that do not
    /// validate are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` if the index file itself cannot be read
    /// or is not a JSON object.
    pub fn open(storage: &Storage, log: LogContext) -> Result<Self, CatalogError> {
        let mut catalog = Self {
            sections: BTreeMap::new(),
            index: Arc::clone(&storage.index),
            lines: Arc::clone(&storage.lines),
            log,
        };

        let index = catalog.index.load_index()?;
        for rejected in index.rejected() {
            tracing::warn!(
                parent: catalog.log.span(),
                section = %rejected.name,
                error = %rejected.reason,
                "skipping malformed index entry"
            );
        }
        for (raw_name, record) in index.iter() {
            let loaded = SectionName::new(raw_name)
                .map_err(CatalogError::from)
                .and_then(|name| catalog.load_section(name, record.clone().into_source()));
            match loaded {
                Ok(section) => {
                    tracing::info!(
                        parent: catalog.log.span(),
                        section = %section.name(),
                        questions = section.question_count(),
                        "section loaded"
                    );
                    catalog.sections.insert(section.name().clone(), section);
                }
                Err(err) => {
                    tracing::warn!(
                        parent: catalog.log.span(),
                        section = raw_name,
                        error = %err,
                        "failed to load section"
                    );
                }
            }
        }

        Ok(catalog)
    }

    #[must_use]
    pub fn names(&self) -> Vec<SectionName> {
        self.sections.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.values()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    #[must_use]
    pub fn source(&self, name: &str) -> Option<&SectionSource> {
        self.sections.get(name).map(Section::source)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Import a new section from its question and answer files.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::AlreadyExists` for a taken name,
    /// `CatalogError::Load` if a file cannot be read,
    /// `CatalogError::Section` if the answer count is not four per question,
    /// `CatalogError::Storage` if the index cannot be written.
    pub fn add(&mut self, name: &str, source: SectionSource) -> Result<SectionName, CatalogError> {
        let name = SectionName::new(name)?;
        if let Some(existing) = self.sections.get_key_value(name.as_str()) {
            return Err(CatalogError::AlreadyExists(existing.0.clone()));
        }

        let section = self.load_section(name.clone(), source)?;
        self.persist_with(|index| index.insert(section.name(), section.source()))?;

        tracing::info!(
            parent: self.log.span(),
            section = %name,
            questions = section.question_count(),
            answers = section.answers().len(),
            "section added"
        );
        self.sections.insert(name.clone(), section);
        Ok(name)
    }

    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` for an unknown name,
    /// `CatalogError::Storage` if the index cannot be written.
    pub fn remove(&mut self, name: &str) -> Result<SectionName, CatalogError> {
        let Some((key, _)) = self.sections.get_key_value(name) else {
            return Err(CatalogError::NotFound(name.to_owned()));
        };
        let key = key.clone();

        self.persist_with(|index| {
            index.remove(key.as_str());
        })?;

        self.sections.remove(key.as_str());
        tracing::info!(parent: self.log.span(), section = %key, "section removed");
        Ok(key)
    }

    /// Rename a section and reload it from (possibly new) files.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if `old_name` is unknown,
    /// `CatalogError::AlreadyExists` if `new_name` belongs to another section,
    /// plus the load, validation and storage errors of [`Self::add`].
    pub fn edit(
        &mut self,
        old_name: &str,
        new_name: &str,
        source: SectionSource,
    ) -> Result<SectionName, CatalogError> {
        let Some((old_key, _)) = self.sections.get_key_value(old_name) else {
            return Err(CatalogError::NotFound(old_name.to_owned()));
        };
        let old_key = old_key.clone();
        let new_name = SectionName::new(new_name)?;
        if new_name != old_key && self.sections.contains_key(new_name.as_str()) {
            return Err(CatalogError::AlreadyExists(new_name));
        }

        let section = self.load_section(new_name.clone(), source)?;
        self.persist_with(|index| {
            index.remove(old_key.as_str());
            index.insert(section.name(), section.source());
        })?;

        self.sections.remove(old_key.as_str());
        tracing::info!(
            parent: self.log.span(),
            from = %old_key,
            to = %new_name,
            questions = section.question_count(),
            "section edited"
        );
        self.sections.insert(new_name.clone(), section);
        Ok(new_name)
    }

    /// Write a section's questions and answers out as newline-delimited files.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` for an unknown name,
    /// `CatalogError::Storage` if either file cannot be written.
    pub fn export(
        &self,
        name: &str,
        questions_out: &Path,
        answers_out: &Path,
    ) -> Result<(), CatalogError> {
        let section = self
            .sections
            .get(name)
            .ok_or_else(|| CatalogError::NotFound(name.to_owned()))?;

        self.lines.write_lines(questions_out, section.questions())?;
        self.lines.write_lines(answers_out, section.answers())?;

        tracing::info!(
            parent: self.log.span(),
            section = %section.name(),
            questions_out = %questions_out.display(),
            answers_out = %answers_out.display(),
            "section exported"
        );
        Ok(())
    }

    /// Rewrite the index from the sections currently loaded.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` if the index cannot be written.
    pub fn save_index(&self) -> Result<(), CatalogError> {
        self.persist_with(|_| {})
    }

    fn snapshot(&self) -> SectionIndex {
        self.sections
            .values()
            .map(|section| (section.name(), section.source()))
            .collect()
    }

    fn persist_with(&self, change: impl FnOnce(&mut SectionIndex)) -> Result<(), CatalogError> {
        let mut index = self.snapshot();
        change(&mut index);
        self.index.save_index(&index)?;
        Ok(())
    }

    fn load_section(&self, name: SectionName, source: SectionSource) -> Result<Section, CatalogError> {
        let questions = self.read(&name, source.questions_file())?;
        let answers = self.read(&name, source.answers_file())?;
        tracing::debug!(
            parent: self.log.span(),
            section = %name,
            questions = questions.len(),
            answers = answers.len(),
            "section files read"
        );
        Ok(Section::new(name, source, questions, answers)?)
    }

    fn read(&self, name: &SectionName, path: &Path) -> Result<Vec<String>, CatalogError> {
        self.lines.read_lines(path).map_err(|source| CatalogError::Load {
            name: name.to_string(),
            source,
        })
    }
}

impl std::fmt::Debug for SectionCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SectionCatalog")
            .field("sections", &self.sections.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
