//! Meta kernel activation.
//!
//! After startup registration the three tables are merged into one record,
//! and each entry is offered to the dispatcher as the operator's abstract
//! (meta) kernel. Operators that already decompose implicitly, and views,
//! are left alone.

use std::ops::Deref;
use std::sync::atomic::Ordering;

use decomp_dispatch::Dispatcher;
use decomp_ops::{Decomposition, OpOverload};
use indexmap::IndexMap;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

use crate::config::ActivationConfig;
use crate::error::{AlreadyActivatedSnafu, InstallConflictSnafu, Result};
use crate::mode::Mode;
use crate::registry::Registry;

/// Why activation left an overload without a meta kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(strum::Display, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum SkipReason {
    /// The dispatcher reports an implicitly composite kernel.
    CompositeImplicitAutograd,
    /// The overload is a view of one of its inputs.
    ReadOnlyAlias,
    /// Registered with `disable_meta` and the configuration honors it.
    DisabledMeta,
}

/// Outcome of one activation pass, in merge order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivationReport {
    pub installed: Vec<OpOverload>,
    pub skipped: Vec<(OpOverload, SkipReason)>,
}

impl ActivationReport {
    pub fn is_installed(&self, overload: &OpOverload) -> bool {
        self.installed.contains(overload)
    }

    pub fn skip_reason(&self, overload: &OpOverload) -> Option<SkipReason> {
        self.skipped.iter().find(|(skipped, _)| skipped == overload).map(|(_, reason)| *reason)
    }
}

/// Merge the registry's tables, first mode in `precedence` winning.
///
/// Modes missing from `precedence` do not contribute.
pub fn merge_tables(registry: &Registry, precedence: &[Mode]) -> IndexMap<OpOverload, Decomposition> {
    let mut merged = IndexMap::new();
    for &mode in precedence {
        for (overload, decomposition) in registry.table(mode).iter() {
            merged.entry(overload.clone()).or_insert_with(|| decomposition.clone());
        }
    }
    merged
}

impl Registry {
    /// Install every eligible decomposition as a meta kernel.
    ///
    /// Runs at most once per registry; a second call fails with
    /// [`crate::Error::AlreadyActivated`]. The first install the dispatcher
    /// rejects aborts the pass.
    #[tracing::instrument(skip_all)]
    pub fn activate_meta(
        &self,
        dispatcher: &mut impl Dispatcher,
        config: &ActivationConfig,
    ) -> Result<ActivationReport> {
        if !config.enabled {
            tracing::info!("meta activation disabled");
            return Ok(ActivationReport::default());
        }
        if self.activated.swap(true, Ordering::AcqRel) {
            return AlreadyActivatedSnafu.fail();
        }

        let mut report = ActivationReport::default();
        for (overload, decomposition) in merge_tables(self, &config.precedence) {
            let name = overload.qualified_name();

            let skip = if config.respect_disabled_meta && self.is_meta_disabled(&overload) {
                Some(SkipReason::DisabledMeta)
            } else if dispatcher.dump_registration_table(&name).contains(config.composite_marker.as_str()) {
                Some(SkipReason::CompositeImplicitAutograd)
            } else if overload.has_read_only_alias() {
                Some(SkipReason::ReadOnlyAlias)
            } else {
                None
            };

            if let Some(reason) = skip {
                tracing::debug!(operator = %name, %reason, "skipping meta kernel");
                report.skipped.push((overload, reason));
                continue;
            }

            dispatcher
                .install_abstract_impl(&overload, decomposition)
                .context(InstallConflictSnafu { operator: &name })?;
            tracing::debug!(operator = %name, "installed meta kernel");
            report.installed.push(overload);
        }

        tracing::info!(installed = report.installed.len(), skipped = report.skipped.len(), "meta activation finished");
        Ok(report)
    }

    /// Activate meta kernels and seal the registry against further registration.
    ///
    /// If [`Registry::activate_meta`] already ran, the registry is sealed
    /// without a second pass and the frozen registry carries no report.
    pub fn freeze(self, dispatcher: &mut impl Dispatcher, config: &ActivationConfig) -> Result<FrozenRegistry> {
        let report = if self.activated.load(Ordering::Acquire) {
            tracing::debug!("meta kernels already activated, sealing without a second pass");
            None
        } else {
            Some(self.activate_meta(dispatcher, config)?)
        };
        self.activated.store(true, Ordering::Release);
        Ok(FrozenRegistry { registry: self, report })
    }
}

/// A registry whose loading phase is over.
///
/// Dereferences to [`Registry`] for queries. Registration needs `&mut
/// Registry` and is therefore unavailable, so the tables can be shared across
/// threads freely.
#[derive(Debug)]
pub struct FrozenRegistry {
    registry: Registry,
    report: Option<ActivationReport>,
}

impl FrozenRegistry {
    /// What activation did while freezing, if it ran then.
    pub fn report(&self) -> Option<&ActivationReport> {
        self.report.as_ref()
    }
}

impl Deref for FrozenRegistry {
    type Target = Registry;

    fn deref(&self) -> &Registry {
        &self.registry
    }
}
