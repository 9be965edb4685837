//! Pre-decode budgets over the raw YAML event stream.
//!
//! The tree builder feeds every parser event through a [`BudgetEnforcer`]
//! to stop pathological inputs (deep nesting, huge scalars, alias bombs)
//! before any handler runs.

use saphyr_parser::Event;

/// Budgets for a streaming YAML scan.
///
/// The defaults are intentionally permissive for typical configuration
/// files while stopping obvious resource-amplifying inputs. Tune these per
/// your application if you regularly process very large YAML streams.
#[derive(Clone, Debug)]
pub struct Budget {
    /// Maximum total parser events (counting every event).
    ///
    /// Default: 1,000,000
    pub max_events: usize,
    /// Maximum number of *nodes* (SequenceStart/MappingStart/Scalar),
    /// including nodes materialized by alias replay.
    ///
    /// Default: 250,000
    pub max_nodes: usize,
    /// Maximum structural nesting depth (sequences + mappings).
    ///
    /// Default: 2,000
    pub max_depth: usize,
    /// Maximum number of YAML documents in the stream.
    ///
    /// Default: 1,024
    pub max_documents: usize,
    /// Maximum number of alias (`*ref`) events allowed.
    ///
    /// Default: 50,000
    pub max_aliases: usize,
    /// Maximum total bytes of scalar contents (sum of scalar lengths).
    ///
    /// Default: 67,108,864 (64 MiB)
    pub max_total_scalar_bytes: usize,
}

impl Default for Budget {
    fn default() -> Self {
        Self {
            max_events: 1_000_000,
            max_nodes: 250_000,
            max_depth: 2_000,
            max_documents: 1_024,
            max_aliases: 50_000,
            max_total_scalar_bytes: 64 * 1024 * 1024,
        }
    }
}

/// Which budget limit was exceeded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BudgetBreach {
    MaxEvents,
    MaxNodes,
    MaxDepth,
    MaxDocuments,
    MaxAliases,
    MaxTotalScalarBytes,
}

/// Streaming budget counter.
pub(crate) struct BudgetEnforcer {
    budget: Budget,
    events: usize,
    nodes: usize,
    depth: usize,
    documents: usize,
    aliases: usize,
    scalar_bytes: usize,
}

impl BudgetEnforcer {
    pub(crate) fn new(budget: Budget) -> Self {
        Self {
            budget,
            events: 0,
            nodes: 0,
            depth: 0,
            documents: 0,
            aliases: 0,
            scalar_bytes: 0,
        }
    }

    /// Observe one raw parser event; report the first breached limit.
    pub(crate) fn observe(&mut self, event: &Event) -> Result<(), BudgetBreach> {
        self.events = self.events.saturating_add(1);
        if self.events > self.budget.max_events {
            return Err(BudgetBreach::MaxEvents);
        }
        match event {
            Event::DocumentStart(_) => {
                self.documents = self.documents.saturating_add(1);
                if self.documents > self.budget.max_documents {
                    return Err(BudgetBreach::MaxDocuments);
                }
            }
            Event::Scalar(value, ..) => {
                self.bump_nodes(1)?;
                self.scalar_bytes = self.scalar_bytes.saturating_add(value.len());
                if self.scalar_bytes > self.budget.max_total_scalar_bytes {
                    return Err(BudgetBreach::MaxTotalScalarBytes);
                }
            }
            Event::SequenceStart(..) | Event::MappingStart(..) => {
                self.bump_nodes(1)?;
                self.depth = self.depth.saturating_add(1);
                if self.depth > self.budget.max_depth {
                    return Err(BudgetBreach::MaxDepth);
                }
            }
            Event::SequenceEnd | Event::MappingEnd => {
                self.depth = self.depth.saturating_sub(1);
            }
            Event::Alias(_) => {
                self.aliases = self.aliases.saturating_add(1);
                if self.aliases > self.budget.max_aliases {
                    return Err(BudgetBreach::MaxAliases);
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Charge `count` nodes materialized by replaying an aliased subtree.
    /// Replayed nodes count against the same node budget as parsed ones, so
    /// alias amplification cannot bypass `max_nodes`.
    pub(crate) fn observe_replay(&mut self, count: usize) -> Result<(), BudgetBreach> {
        self.bump_nodes(count)
    }

    fn bump_nodes(&mut self, count: usize) -> Result<(), BudgetBreach> {
        self.nodes = self.nodes.saturating_add(count);
        if self.nodes > self.budget.max_nodes {
            return Err(BudgetBreach::MaxNodes);
        }
        Ok(())
    }
}
