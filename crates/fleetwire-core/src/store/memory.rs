// ── In-memory store ──
//
// Test double for `ConfigStore`. Keeps sections in insertion order and
// records which configs were committed so tests can assert on both the
// final shape and the commit discipline of a workflow run.

use std::collections::BTreeMap;

use crate::error::CoreError;
use crate::store::ConfigStore;

/// One section as held by [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub config: String,
    pub id: String,
    pub stype: String,
    pub options: BTreeMap<String, String>,
}

/// In-memory [`ConfigStore`] used by workflow and module tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sections: Vec<Section>,
    committed: Vec<String>,
    next_anon: usize,
    fail_commit: Option<String>,
}

impl MemoryStore {
    /// Make `commit` fail for the named config.
    pub fn fail_commit_of(&mut self, config: &str) {
        self.fail_commit = Some(config.to_owned());
    }

    /// All sections of a type within a config, in insertion order.
    pub fn sections_of(&self, config: &str, stype: &str) -> Vec<&Section> {
        self.sections
            .iter()
            .filter(|s| s.config == config && s.stype == stype)
            .collect()
    }

    /// Option value for a section, if both exist.
    pub fn get(&self, config: &str, section: &str, option: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|s| s.config == config && s.id == section)
            .and_then(|s| s.options.get(option))
            .map(String::as_str)
    }

    /// How many times a config was committed.
    pub fn commit_count(&self, config: &str) -> usize {
        self.committed.iter().filter(|c| *c == config).count()
    }

    fn section_mut(&mut self, config: &str, section: &str) -> Result<&mut Section, CoreError> {
        self.sections
            .iter_mut()
            .find(|s| s.config == config && s.id == section)
            .ok_or_else(|| CoreError::StoreWrite {
                reason: format!("no section {config}.{section}"),
            })
    }
}

impl ConfigStore for MemoryStore {
    fn find_section(
        &mut self,
        config: &str,
        stype: &str,
        criteria: &[(&str, &str)],
    ) -> Result<Option<String>, CoreError> {
        let found = self
            .sections
            .iter()
            .find(|s| {
                s.config == config
                    && s.stype == stype
                    && criteria
                        .iter()
                        .all(|(k, v)| s.options.get(*k).is_some_and(|have| have == v))
            })
            .map(|s| s.id.clone());
        Ok(found)
    }

    fn add_section(&mut self, config: &str, stype: &str) -> Result<String, CoreError> {
        let id = format!("cfg{:06x}", self.next_anon);
        self.next_anon += 1;
        self.sections.push(Section {
            config: config.to_owned(),
            id: id.clone(),
            stype: stype.to_owned(),
            options: BTreeMap::new(),
        });
        Ok(id)
    }

    fn define_section(
        &mut self,
        config: &str,
        name: &str,
        stype: &str,
    ) -> Result<(), CoreError> {
        if self
            .sections
            .iter()
            .any(|s| s.config == config && s.id == name)
        {
            return Ok(());
        }
        self.sections.push(Section {
            config: config.to_owned(),
            id: name.to_owned(),
            stype: stype.to_owned(),
            options: BTreeMap::new(),
        });
        Ok(())
    }

    fn set_option(
        &mut self,
        config: &str,
        section: &str,
        option: &str,
        value: &str,
    ) -> Result<(), CoreError> {
        self.section_mut(config, section)?
            .options
            .insert(option.to_owned(), value.to_owned());
        Ok(())
    }

    fn delete_option(
        &mut self,
        config: &str,
        section: &str,
        option: &str,
    ) -> Result<(), CoreError> {
        self.section_mut(config, section)?.options.remove(option);
        Ok(())
    }

    fn commit(&mut self, config: &str) -> Result<(), CoreError> {
        if self.fail_commit.as_deref() == Some(config) {
            return Err(CoreError::CommitFailed {
                config: config.to_owned(),
                reason: "injected commit failure".to_owned(),
            });
        }
        self.committed.push(config.to_owned());
        Ok(())
    }
}
