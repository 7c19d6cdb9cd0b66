// ── uci-backed store ──
//
// Production `ConfigStore` that shells out to the router's `uci` binary.
// Reads go through `uci show <config>` and are parsed line-wise; writes
// stage through `uci set`/`add`/`delete` and persist on `uci commit`.
// Anonymous sections are addressed by the `@type[n]` form `uci show`
// prints, which `uci set` accepts back verbatim.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::CoreError;
use crate::runner::{ExecOutput, Runner};
use crate::store::ConfigStore;

/// `ConfigStore` over the device's `uci` command.
pub struct UciStore<'a> {
    runner: &'a dyn Runner,
}

impl<'a> UciStore<'a> {
    pub fn new(runner: &'a dyn Runner) -> Self {
        Self { runner }
    }

    fn uci(&self, args: &[&str]) -> Result<ExecOutput, CoreError> {
        self.runner.run("uci", args)
    }

    fn write(&self, args: &[&str]) -> Result<(), CoreError> {
        let out = self.uci(args)?;
        if out.success() {
            Ok(())
        } else {
            Err(CoreError::StoreWrite {
                reason: format!("uci {}: {}", args.join(" "), out.failure_reason()),
            })
        }
    }
}

/// Parsed view of one `uci show <config>` dump.
#[derive(Debug, Default)]
struct ConfigDump {
    // section id -> (type, options), in dump order
    sections: Vec<(String, String, BTreeMap<String, String>)>,
}

impl ConfigDump {
    fn parse(config: &str, dump: &str) -> Self {
        let mut parsed = Self::default();
        let prefix = format!("{config}.");
        for line in dump.lines() {
            let Some(rest) = line.strip_prefix(&prefix) else {
                continue;
            };
            let Some((path, value)) = rest.split_once('=') else {
                continue;
            };
            match path.split_once('.') {
                // config.section.option='value'
                Some((section, option)) => {
                    if let Some(entry) = parsed
                        .sections
                        .iter_mut()
                        .find(|(id, _, _)| id == section)
                    {
                        entry
                            .2
                            .insert(option.to_owned(), unquote(value).to_owned());
                    }
                }
                // config.section=type
                None => {
                    parsed
                        .sections
                        .push((path.to_owned(), value.to_owned(), BTreeMap::new()));
                }
            }
        }
        parsed
    }
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('\'')
        .and_then(|v| v.strip_suffix('\''))
        .unwrap_or(value)
}

impl ConfigStore for UciStore<'_> {
    fn find_section(
        &mut self,
        config: &str,
        stype: &str,
        criteria: &[(&str, &str)],
    ) -> Result<Option<String>, CoreError> {
        let out = self.uci(&["show", config])?;
        if !out.success() {
            // Missing config file: nothing to find.
            debug!(config, "uci show reported no such config");
            return Ok(None);
        }
        let dump = ConfigDump::parse(config, &out.stdout);
        let found = dump
            .sections
            .iter()
            .find(|(_, st, options)| {
                st == stype
                    && criteria
                        .iter()
                        .all(|(k, v)| options.get(*k).is_some_and(|have| have == v))
            })
            .map(|(id, _, _)| id.clone());
        Ok(found)
    }

    fn add_section(&mut self, config: &str, stype: &str) -> Result<String, CoreError> {
        let out = self.uci(&["add", config, stype])?;
        if !out.success() {
            return Err(CoreError::StoreWrite {
                reason: format!("uci add {config} {stype}: {}", out.failure_reason()),
            });
        }
        let id = out.stdout.trim().to_owned();
        if id.is_empty() {
            return Err(CoreError::StoreWrite {
                reason: format!("uci add {config} {stype} returned no section id"),
            });
        }
        Ok(id)
    }

    fn define_section(
        &mut self,
        config: &str,
        name: &str,
        stype: &str,
    ) -> Result<(), CoreError> {
        self.write(&["set", &format!("{config}.{name}={stype}")])
    }

    fn set_option(
        &mut self,
        config: &str,
        section: &str,
        option: &str,
        value: &str,
    ) -> Result<(), CoreError> {
        self.write(&["set", &format!("{config}.{section}.{option}={value}")])
    }

    fn delete_option(
        &mut self,
        config: &str,
        section: &str,
        option: &str,
    ) -> Result<(), CoreError> {
        // Absent options exit non-zero; that is the expected steady state.
        let _ = self.uci(&["-q", "delete", &format!("{config}.{section}.{option}")])?;
        Ok(())
    }

    fn commit(&mut self, config: &str) -> Result<(), CoreError> {
        let out = self.uci(&["commit", config])?;
        if out.success() {
            Ok(())
        } else {
            Err(CoreError::CommitFailed {
                config: config.to_owned(),
                reason: out.failure_reason(),
            })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testkit::{failure, success, ScriptedRunner};

    const FIREWALL_DUMP: &str = "\
firewall.@defaults[0]=defaults
firewall.@defaults[0].input='ACCEPT'
firewall.@zone[0]=zone
firewall.@zone[0].name='lan'
firewall.@zone[1]=zone
firewall.@zone[1].name='tailscale'
firewall.@zone[1].masq='1'
firewall.@forwarding[0]=forwarding
firewall.@forwarding[0].src='tailscale'
firewall.@forwarding[0].dest='lan'
";

    #[test]
    fn finds_section_by_criteria() {
        let runner = ScriptedRunner::new();
        runner.respond("uci show firewall", success(FIREWALL_DUMP));
        let mut store = UciStore::new(&runner);

        let id = store
            .find_section("firewall", "zone", &[("name", "tailscale")])
            .unwrap();
        assert_eq!(id.as_deref(), Some("@zone[1]"));
    }

    #[test]
    fn criteria_must_all_match() {
        let runner = ScriptedRunner::new();
        runner.respond("uci show firewall", success(FIREWALL_DUMP));
        let mut store = UciStore::new(&runner);

        let id = store
            .find_section(
                "firewall",
                "forwarding",
                &[("src", "lan"), ("dest", "tailscale")],
            )
            .unwrap();
        assert_eq!(id, None);
    }

    #[test]
    fn missing_config_finds_nothing() {
        let runner = ScriptedRunner::new();
        runner.respond("uci show xray", failure(1, "uci: Entry not found"));
        let mut store = UciStore::new(&runner);

        let id = store.find_section("xray", "profile", &[]).unwrap();
        assert_eq!(id, None);
    }

    #[test]
    fn add_returns_generated_id() {
        let runner = ScriptedRunner::new();
        runner.respond("uci add firewall zone", success("cfg0bad42\n"));
        let mut store = UciStore::new(&runner);

        let id = store.add_section("firewall", "zone").unwrap();
        assert_eq!(id, "cfg0bad42");
    }

    #[test]
    fn set_failure_is_a_write_error() {
        let runner = ScriptedRunner::new();
        runner.respond(
            "uci set network.tailscale.proto=none",
            failure(1, "uci: Invalid argument"),
        );
        let mut store = UciStore::new(&runner);

        let err = store
            .set_option("network", "tailscale", "proto", "none")
            .unwrap_err();
        assert!(matches!(err, CoreError::StoreWrite { .. }));
    }

    #[test]
    fn delete_of_absent_option_is_ok() {
        let runner = ScriptedRunner::new();
        runner.respond(
            "uci -q delete xray.fleet.split_dns_type",
            failure(1, ""),
        );
        let mut store = UciStore::new(&runner);

        store.delete_option("xray", "fleet", "split_dns_type").unwrap();
    }

    #[test]
    fn commit_failure_carries_config_name() {
        let runner = ScriptedRunner::new();
        runner.respond("uci commit firewall", failure(1, "lock held"));
        let mut store = UciStore::new(&runner);

        let err = store.commit("firewall").unwrap_err();
        assert!(matches!(err, CoreError::CommitFailed { config, .. } if config == "firewall"));
    }
}
