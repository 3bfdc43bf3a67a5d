//! Frontier growth from the start room and end-room capping.

use std::cmp::Reverse;

use crate::catalog::{TileTemplate, tags};
use crate::collision::collides;
use crate::placement::{OpenConnector, Placement, solve_placements};
use crate::rng::SeededRng;

use super::{EndPlacement, GraphBuild};

const CORRIDOR_PREFERENCE: f64 = 0.75;

/// Forces a room after a run of one to three corridors.
struct Pacing {
    corridor_run: i64,
    run_target: i64,
}

impl Pacing {
    fn new(rng: &mut SeededRng) -> Self {
        Self { corridor_run: 0, run_target: rng.range(1, 3) }
    }

    fn room_due(&self) -> bool {
        self.corridor_run >= self.run_target
    }

    fn record(&mut self, template: &TileTemplate, rng: &mut SeededRng) {
        if template.is_room() {
            self.corridor_run = 0;
            self.run_target = rng.range(1, 3);
        } else {
            self.corridor_run += 1;
        }
    }
}

impl<'a> GraphBuild<'a> {
    pub(super) fn grow_main_path(&mut self) {
        let target = self.config.effective_min_path_length();
        let mut pacing = Pacing::new(&mut self.rng);

        while self.main_path_nodes < target && self.report.attempts_used < self.config.max_attempts
        {
            let Some(frontier_index) = self.rng.pick_index(self.frontier.len()) else {
                log::debug!("frontier exhausted at main path length {}", self.main_path_nodes);
                break;
            };
            self.report.attempts_used += 1;
            let Some(template) = self.pick_growth_tile(pacing.room_due()) else {
                log::debug!("catalog has no growth tiles");
                break;
            };

            let source = self.frontier[frontier_index].clone();
            let placements = solve_placements(&source, template);
            let Some(&placement) = self.rng.pick(&placements) else {
                self.report.unmatched_attempts += 1;
                continue;
            };
            if collides(&placement.bounds(template), &self.nodes) {
                self.report.collisions_rejected += 1;
                log::debug!(
                    "'{}' at {:?} rot {} collides, keeping exit open",
                    template.id,
                    placement.position,
                    placement.rotation.quarter_turns()
                );
                continue;
            }

            self.frontier.swap_remove(frontier_index);
            self.retire_siblings(source.node_index);
            let index =
                self.attach(&source, template, placement, tags::MAIN_PATH, source.distance + 1);
            self.main_path_nodes += 1;
            let exits = self.unused_connectors(index, template, placement);
            self.frontier.extend(exits);
            pacing.record(template, &mut self.rng);
            log::debug!(
                "main path node {index} '{}' at {:?}, distance {}",
                template.id,
                placement.position,
                source.distance + 1
            );
        }

        self.report.reached_min_path_length = self.main_path_nodes >= target;
    }

    /// Tries the farthest frontier exits first, then the branch pool in the same order.
    /// Whatever frontier remains afterwards joins the branch pool.
    pub(super) fn place_end(&mut self) -> EndPlacement {
        let outcome = if let Some((index, template, placement)) = self.find_end_fit(&self.frontier)
        {
            let source = self.frontier.remove(index);
            self.attach_end(&source, template, placement);
            EndPlacement::Frontier
        } else if let Some((index, template, placement)) = self.find_end_fit(&self.branch_pool) {
            let source = self.branch_pool.remove(index);
            self.attach_end(&source, template, placement);
            EndPlacement::BranchPool
        } else {
            EndPlacement::Unplaced
        };

        self.branch_pool.append(&mut self.frontier);
        outcome
    }

    /// A due room with no room templates, or a corridor roll with no corridor templates, falls
    /// back to one uniform pick over the whole growth pool.
    fn pick_growth_tile(&mut self, room_due: bool) -> Option<&'a TileTemplate> {
        if room_due {
            let pool =
                if self.room_tiles.is_empty() { &self.growth_tiles } else { &self.room_tiles };
            return self.rng.pick(pool).copied();
        }
        if !self.corridor_tiles.is_empty() && self.rng.chance(CORRIDOR_PREFERENCE) {
            return self.rng.pick(&self.corridor_tiles).copied();
        }
        self.rng.pick(&self.growth_tiles).copied()
    }

    /// Other exits of a node the path just left are no longer main-path candidates.
    fn retire_siblings(&mut self, node_index: usize) {
        let (siblings, remaining): (Vec<OpenConnector>, Vec<OpenConnector>) =
            self.frontier.drain(..).partition(|open| open.node_index == node_index);
        self.frontier = remaining;
        self.branch_pool.extend(siblings);
    }

    fn find_end_fit(
        &self,
        pool: &[OpenConnector],
    ) -> Option<(usize, &'a TileTemplate, Placement)> {
        let mut order: Vec<usize> = (0..pool.len()).collect();
        order.sort_by_key(|&index| Reverse(pool[index].distance));

        for index in order {
            for &template in &self.end_tiles {
                let fit = solve_placements(&pool[index], template)
                    .into_iter()
                    .find(|placement| !collides(&placement.bounds(template), &self.nodes));
                if let Some(placement) = fit {
                    return Some((index, template, placement));
                }
            }
        }
        None
    }

    fn attach_end(
        &mut self,
        source: &OpenConnector,
        template: &TileTemplate,
        placement: Placement,
    ) {
        let index = self.attach(source, template, placement, tags::MAIN_PATH, source.distance + 1);
        self.nodes[index].tags.insert(tags::BOSS_ROOM.to_string());
        self.main_path_nodes += 1;
        self.end_node_index = Some(index);
        log::debug!(
            "end room '{}' attached to node {} at distance {}",
            template.id,
            source.node_index,
            source.distance + 1
        );
    }
}
