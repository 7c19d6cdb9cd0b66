// ── Configuration store capability ──
//
// Section-based key/value store with an explicit commit-to-persist step.
// The workflow only ever writes; the single read path (`find_section`)
// exists so repeated runs can reuse sections instead of appending
// duplicates (lookup-or-create).

mod memory;
mod uci;

pub use memory::{MemoryStore, Section};
pub use uci::UciStore;

use crate::error::CoreError;

/// Injected capability over the device's persistent configuration store.
///
/// `config` names a top-level configuration file (e.g. `firewall`),
/// `section` a named or generated section id within it. Writes are staged
/// until `commit` persists one config atomically.
pub trait ConfigStore: Send {
    /// Find a section of `stype` whose options match every `(key, value)`
    /// pair in `criteria`. Empty criteria matches the first section of the
    /// type. A missing config is not an error -- there is nothing to find.
    fn find_section(
        &mut self,
        config: &str,
        stype: &str,
        criteria: &[(&str, &str)],
    ) -> Result<Option<String>, CoreError>;

    /// Append an anonymous section, returning its generated id.
    fn add_section(&mut self, config: &str, stype: &str) -> Result<String, CoreError>;

    /// Declare a named section of the given type (idempotent).
    fn define_section(
        &mut self,
        config: &str,
        name: &str,
        stype: &str,
    ) -> Result<(), CoreError>;

    fn set_option(
        &mut self,
        config: &str,
        section: &str,
        option: &str,
        value: &str,
    ) -> Result<(), CoreError>;

    /// Delete an option; absent options are not an error.
    fn delete_option(
        &mut self,
        config: &str,
        section: &str,
        option: &str,
    ) -> Result<(), CoreError>;

    /// Persist all staged changes for one config.
    fn commit(&mut self, config: &str) -> Result<(), CoreError>;
}

/// Lookup-or-create: return the matching section if one exists, otherwise
/// append one and seed it with the criteria options.
pub fn ensure_section(
    store: &mut dyn ConfigStore,
    config: &str,
    stype: &str,
    criteria: &[(&str, &str)],
) -> Result<String, CoreError> {
    if let Some(id) = store.find_section(config, stype, criteria)? {
        return Ok(id);
    }
    let id = store.add_section(config, stype)?;
    for (option, value) in criteria {
        store.set_option(config, &id, option, value)?;
    }
    Ok(id)
}
