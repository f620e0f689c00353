//! Committing discovered tokens into an engine instance.

use styleframe_core::Styleframe;

use super::cache::SessionCache;
use crate::logging::targets;
use crate::scanner::ScanResult;
use crate::Result;

/// Counters for one commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitReport {
    /// Distinct tokens offered.
    pub tokens_seen: usize,
    /// `(generator, token)` pairs generated by this commit.
    pub new_entries: usize,
    /// Pairs already in the session cache.
    pub cached_entries: usize,
    /// Containers emitted or merged by this commit.
    pub containers: usize,
}

impl CommitReport {
    /// Whether the commit changed the emitted CSS.
    pub fn changed(&self) -> bool {
        self.new_entries > 0
    }
}

/// Feeds scan results to an instance's generators through the session cache.
///
/// Commits are monotonic: a token that disappears from content keeps its
/// rules until [`reset`](Self::reset).
#[derive(Debug, Default)]
pub struct IncrementalCompiler {
    cache: SessionCache,
}

impl IncrementalCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit every token of `scan`.
    pub fn commit(&mut self, instance: &mut Styleframe, scan: &ScanResult) -> Result<CommitReport> {
        self.commit_tokens(instance, scan.distinct_tokens())
    }

    /// Commit `tokens`, generating each `(generator, token)` pair not yet in
    /// the session cache. Tokens no generator produces are ignored.
    pub fn commit_tokens<'t>(
        &mut self,
        instance: &mut Styleframe,
        tokens: impl IntoIterator<Item = &'t str>,
    ) -> Result<CommitReport> {
        let mut report = CommitReport::default();

        for token in tokens {
            report.tokens_seen += 1;
            let generators = instance.generators_for(token).to_vec();
            for id in generators {
                if self.cache.contains(id, token) {
                    report.cached_entries += 1;
                    continue;
                }
                let containers = instance.generate(id, token)?;
                report.containers += containers.len();
                report.new_entries += 1;
                tracing::trace!(
                    target: targets::COMPILER,
                    generator = instance.generator_name(id).unwrap_or_default(),
                    token,
                    "committed"
                );
                self.cache.insert(id, token, containers);
            }
        }

        tracing::debug!(
            target: targets::COMPILER,
            tokens = report.tokens_seen,
            new = report.new_entries,
            cached = report.cached_entries,
            "commit finished"
        );
        Ok(report)
    }

    pub fn cache(&self) -> &SessionCache {
        &self.cache
    }

    /// Forget every committed entry. Only a cold rebuild should call this.
    pub fn reset(&mut self) {
        tracing::info!(target: targets::COMPILER, entries = self.cache.len(), "session cache reset");
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use styleframe_core::prelude::*;

    fn instance() -> Styleframe {
        let mut sf = Styleframe::new("app").with_mode(EmitMode::OnDemand);
        let table: ValueTable = [("a", "1px"), ("b", "2px"), ("c", "3px")].into_iter().collect();
        let handle = sf
            .register_utility(UtilityDefinition::property("m", "margin"))
            .unwrap();
        handle.apply(&mut sf, Some(&table)).unwrap();
        sf
    }

    #[test]
    fn commits_are_monotonic() {
        let mut sf = instance();
        let mut compiler = IncrementalCompiler::new();

        let report = compiler.commit_tokens(&mut sf, ["m:a", "m:b"]).unwrap();
        assert_eq!(report.new_entries, 2);

        let report = compiler.commit_tokens(&mut sf, ["m:b", "m:c"]).unwrap();
        assert_eq!(report.new_entries, 1);
        assert_eq!(report.cached_entries, 1);

        let css = sf.serialize().unwrap();
        assert!(css.contains("1px") && css.contains("2px") && css.contains("3px"));
        assert_eq!(compiler.cache().len(), 3);
    }

    #[test]
    fn unknown_tokens_are_ignored() {
        let mut sf = instance();
        let mut compiler = IncrementalCompiler::new();

        let report = compiler.commit_tokens(&mut sf, ["div", "class"]).unwrap();
        assert_eq!(report.tokens_seen, 2);
        assert!(!report.changed());
        assert!(compiler.cache().is_empty());
    }

    #[test]
    fn reset_clears_cache() {
        let mut sf = instance();
        let mut compiler = IncrementalCompiler::new();
        compiler.commit_tokens(&mut sf, ["m:a"]).unwrap();

        compiler.reset();
        assert!(compiler.cache().is_empty());
    }
}
