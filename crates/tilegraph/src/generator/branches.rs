//! Best-effort side branches hung off leftover main-path exits.

use crate::catalog::tags;
use crate::collision::collides;
use crate::placement::solve_placements;

use super::GraphBuild;

impl GraphBuild<'_> {
    /// Each pool exit gets a single try; failed exits are discarded, never retried.
    pub(super) fn grow_branches(&mut self) {
        let budget = self.config.target_size.saturating_sub(self.main_path_nodes);
        let limit = self.config.max_branches.min(budget);

        while self.report.branches_placed < limit {
            let Some(pool_index) = self.rng.pick_index(self.branch_pool.len()) else {
                break;
            };
            let source = self.branch_pool.swap_remove(pool_index);
            self.report.branch_attempts += 1;
            let Some(&template) = self.rng.pick(&self.branch_tiles) else {
                break;
            };

            let fit = solve_placements(&source, template)
                .into_iter()
                .find(|placement| !collides(&placement.bounds(template), &self.nodes));
            match fit {
                Some(placement) => {
                    let index = self.attach(&source, template, placement, tags::BRANCH, -1);
                    self.report.branches_placed += 1;
                    log::debug!(
                        "branch node {index} '{}' off node {}",
                        template.id,
                        source.node_index
                    );
                }
                None => log::debug!(
                    "no room for branch '{}' off node {}, dropping exit",
                    template.id,
                    source.node_index
                ),
            }
        }
    }
}
