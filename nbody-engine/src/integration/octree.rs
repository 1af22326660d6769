// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Barnes-Hut octree
//!
//! Internal acceleration structure for the gravity integrator. The tree is
//! rebuilt from the pre-step snapshot inside every step and dropped
//! afterwards; nothing outside the integrator ever sees it.
//!
//! Space is split into a cube around all bodies and subdivided into octants
//! until each leaf holds one body. Coincident bodies would subdivide
//! forever, so below `MAX_DEPTH` a leaf keeps every body it receives.
//!
//! Each node stores its total mass and center of mass. During traversal, a
//! node whose `size / distance` falls below `theta` contributes as one mass
//! at its center of mass; otherwise its children are visited. With
//! `theta = 0` no node is ever approximated and the sum equals the direct
//! one up to summation order.

use crate::body::Body;
use crate::config::CoincidencePolicy;
use crate::integration::gravity::pair_term;
use glam::DVec3;

/// Depth at which leaves stop subdividing
const MAX_DEPTH: usize = 32;

#[derive(Debug)]
struct Node {
    mass: f64,
    center_of_mass: DVec3,
    min: DVec3,
    max: DVec3,
    children: [Option<usize>; 8],
    /// Bodies stored directly in this node (leaves only)
    bodies: Vec<usize>,
}

impl Node {
    fn empty(min: DVec3, max: DVec3) -> Self {
        Node {
            mass: 0.0,
            center_of_mass: DVec3::ZERO,
            min,
            max,
            children: [None; 8],
            bodies: Vec::new(),
        }
    }

    fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }

    fn size(&self) -> f64 {
        (self.max - self.min).max_element()
    }

    fn contains(&self, p: DVec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}

/// Octree over one snapshot of the body set
#[derive(Debug)]
pub(crate) struct Octree {
    nodes: Vec<Node>,
}

impl Octree {
    /// Build the tree and its mass moments
    pub(crate) fn build(bodies: &[Body]) -> Self {
        let (min, max) = bounding_cube(bodies);
        let mut tree = Octree { nodes: vec![Node::empty(min, max)] };

        for (i, body) in bodies.iter().enumerate() {
            tree.insert(0, i, body.position, bodies, 0);
        }
        tree.compute_moments(0, bodies);

        tree
    }

    fn insert(&mut self, node_idx: usize, body_idx: usize, position: DVec3, bodies: &[Body], depth: usize) {
        let node = &self.nodes[node_idx];

        if node.is_leaf() {
            if node.bodies.is_empty() || depth >= MAX_DEPTH {
                self.nodes[node_idx].bodies.push(body_idx);
                return;
            }

            // Occupied leaf: push its resident(s) one level down first
            let residents = std::mem::take(&mut self.nodes[node_idx].bodies);
            for resident in residents {
                let resident_position = bodies[resident].position;
                let child = self.child_for(node_idx, resident_position);
                self.insert(child, resident, resident_position, bodies, depth + 1);
            }
        }

        let child = self.child_for(node_idx, position);
        self.insert(child, body_idx, position, bodies, depth + 1);
    }

    /// Index of the child octant containing `position`, created on demand
    fn child_for(&mut self, node_idx: usize, position: DVec3) -> usize {
        let (min, max) = (self.nodes[node_idx].min, self.nodes[node_idx].max);
        let octant = octant_for_point(position, min, max);

        match self.nodes[node_idx].children[octant] {
            Some(idx) => idx,
            None => {
                let (cmin, cmax) = octant_bounds(min, max, octant);
                let idx = self.nodes.len();
                self.nodes.push(Node::empty(cmin, cmax));
                self.nodes[node_idx].children[octant] = Some(idx);
                idx
            }
        }
    }

    fn compute_moments(&mut self, node_idx: usize, bodies: &[Body]) {
        let mut mass = 0.0;
        let mut weighted = DVec3::ZERO;

        for &b in &self.nodes[node_idx].bodies {
            mass += bodies[b].mass();
            weighted += bodies[b].position * bodies[b].mass();
        }

        let children = self.nodes[node_idx].children;
        for child in children.iter().flatten() {
            self.compute_moments(*child, bodies);
            let c = &self.nodes[*child];
            mass += c.mass;
            weighted += c.center_of_mass * c.mass;
        }

        let node = &mut self.nodes[node_idx];
        node.mass = mass;
        if mass > 0.0 {
            node.center_of_mass = weighted / mass;
        }
    }

    /// Force sum on body `target`, before scaling by -G
    pub(crate) fn sum_for_body(
        &self,
        target: usize,
        bodies: &[Body],
        theta: f64,
        softening: f64,
        coincidence: CoincidencePolicy,
    ) -> DVec3 {
        let mut sum = DVec3::ZERO;
        let mut stack = vec![0usize];
        let ri = bodies[target].position;

        while let Some(node_idx) = stack.pop() {
            let node = &self.nodes[node_idx];
            if node.mass == 0.0 {
                continue;
            }

            if node.is_leaf() {
                for &j in &node.bodies {
                    if j == target {
                        continue;
                    }
                    if let Some(term) = pair_term(ri, bodies[j].position, bodies[j].mass(), softening, coincidence) {
                        sum += term;
                    }
                }
                continue;
            }

            // A node holding the target is always opened so it never pulls on itself
            let distance = ri.distance(node.center_of_mass);
            if !node.contains(ri) && distance > 0.0 && node.size() / distance < theta {
                if let Some(term) = pair_term(ri, node.center_of_mass, node.mass, softening, coincidence) {
                    sum += term;
                }
            } else {
                // Reverse so children pop in octant order
                stack.extend(node.children.iter().rev().flatten());
            }
        }

        sum
    }

    #[cfg(test)]
    fn leaf_population(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).map(|n| n.bodies.len()).sum()
    }
}

/// Smallest axis-aligned cube enclosing every body
fn bounding_cube(bodies: &[Body]) -> (DVec3, DVec3) {
    let mut min = DVec3::splat(f64::INFINITY);
    let mut max = DVec3::splat(f64::NEG_INFINITY);

    for body in bodies {
        min = min.min(body.position);
        max = max.max(body.position);
    }

    if bodies.is_empty() {
        return (DVec3::ZERO, DVec3::ZERO);
    }

    let center = (min + max) * 0.5;
    let half = DVec3::splat(((max - min) * 0.5).max_element());
    (center - half, center + half)
}

/// Octant index: bit 0 = x upper half, bit 1 = y, bit 2 = z
fn octant_for_point(p: DVec3, min: DVec3, max: DVec3) -> usize {
    let center = (min + max) * 0.5;
    let mut idx = 0;
    if p.x >= center.x {
        idx |= 1;
    }
    if p.y >= center.y {
        idx |= 2;
    }
    if p.z >= center.z {
        idx |= 4;
    }
    idx
}

fn octant_bounds(parent_min: DVec3, parent_max: DVec3, octant: usize) -> (DVec3, DVec3) {
    let center = (parent_min + parent_max) * 0.5;
    let mut min = parent_min;
    let mut max = parent_max;

    if octant & 1 == 0 {
        max.x = center.x;
    } else {
        min.x = center.x;
    }
    if octant & 2 == 0 {
        max.y = center.y;
    } else {
        min.y = center.y;
    }
    if octant & 4 == 0 {
        max.z = center.z;
    } else {
        min.z = center.z;
    }

    (min, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Mass;

    #[test]
    fn test_root_moments() {
        let bodies = vec![
            Body::at_rest(DVec3::new(-1.0, 0.0, 0.0), Mass::new(1.0)),
            Body::at_rest(DVec3::new(1.0, 0.0, 0.0), Mass::new(3.0)),
        ];
        let tree = Octree::build(&bodies);

        assert_eq!(tree.nodes[0].mass, 4.0);
        assert!((tree.nodes[0].center_of_mass.x - 0.5).abs() < 1e-12);
        assert_eq!(tree.leaf_population(), 2);
    }

    #[test]
    fn test_coincident_bodies_terminate() {
        let bodies = vec![Body::at_rest(DVec3::ONE, Mass::new(1.0)); 5];
        let tree = Octree::build(&bodies);

        assert_eq!(tree.leaf_population(), 5);
        assert_eq!(tree.nodes[0].mass, 5.0);
    }

    #[test]
    fn test_octant_roundtrip() {
        let (min, max) = (DVec3::splat(-1.0), DVec3::splat(1.0));
        for octant in 0..8 {
            let (cmin, cmax) = octant_bounds(min, max, octant);
            let mid = (cmin + cmax) * 0.5;
            assert_eq!(octant_for_point(mid, min, max), octant);
        }
    }

    #[test]
    fn test_target_never_inside_approximated_node() {
        let bodies = vec![
            Body::at_rest(DVec3::ZERO, Mass::new(100.0)),
            Body::at_rest(DVec3::splat(10.0), Mass::new(1.0)),
        ];
        let tree = Octree::build(&bodies);

        for target in 0..2 {
            let exact = tree.sum_for_body(target, &bodies, 0.0, 0.0, CoincidencePolicy::Propagate);
            for theta in [0.6, 1.0, 5.0] {
                let approx = tree.sum_for_body(target, &bodies, theta, 0.0, CoincidencePolicy::Propagate);
                assert!((exact - approx).length() <= 1e-12 * exact.length());
            }
        }
    }

    #[test]
    fn test_far_cluster_is_approximated() {
        let mut bodies = vec![Body::at_rest(DVec3::ZERO, Mass::new(1.0))];
        for k in 0..4 {
            let offset = 0.01 * k as f64;
            bodies.push(Body::at_rest(DVec3::new(100.0 + offset, offset, 0.0), Mass::new(1.0)));
        }
        let tree = Octree::build(&bodies);

        let exact = tree.sum_for_body(0, &bodies, 0.0, 0.0, CoincidencePolicy::Skip);
        let approx = tree.sum_for_body(0, &bodies, 1.0, 0.0, CoincidencePolicy::Skip);

        assert!((exact - approx).length() / exact.length() < 1e-3);
    }
}
