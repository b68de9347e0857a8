use super::*;

/// Depth beyond which [`Network::max_depth`] gives up.
pub const DEFAULT_MAX_DEPTH: usize = 100;

impl Network {
    /// Whether a new link `in_node -> out_node` would close a cycle in the
    /// forward subgraph.
    ///
    /// Walks backwards from `in_node` over non-recurrent links. Every visited
    /// node bumps `count`; once it passes `thresh` the search answers false.
    pub fn is_recurrent(
        &self,
        in_node: NodeIndex,
        out_node: NodeIndex,
        count: &mut usize,
        thresh: usize,
    ) -> bool {
        *count += 1;
        if *count > thresh {
            return false;
        }
        if in_node == out_node {
            return true;
        }
        let Some(node) = self.nodes.get(in_node) else {
            return false;
        };
        node.incoming.iter().any(|&li| {
            let link = &self.links[li];
            !link.is_recurrent && self.is_recurrent(link.source, out_node, count, thresh)
        })
    }

    /// Longest chain of neurons between an input and an output.
    pub fn max_depth(&self) -> Result<usize> {
        self.max_depth_with_limit(DEFAULT_MAX_DEPTH)
    }

    pub fn max_depth_with_limit(&self, limit: usize) -> Result<usize> {
        if self.is_modular() {
            return Err(NetError::UnsupportedForModular("MaxDepth"));
        }
        if self.all_nodes.len() == self.inputs.len() + self.outputs.len() {
            return Ok(1);
        }

        let mut on_path = vec![false; self.nodes.len()];
        let mut longest = vec![None; self.nodes.len()];
        let mut max = 0;
        for &out in &self.outputs {
            max = max.max(self.depth(out, 0, limit, &mut on_path, &mut longest)?);
        }
        Ok(max)
    }

    /// Longest chain from `idx` back to a sensor, skipping nodes already on
    /// the current path. `longest` keeps each node's result once known.
    fn depth(
        &self,
        idx: NodeIndex,
        d: usize,
        limit: usize,
        on_path: &mut [bool],
        longest: &mut [Option<usize>],
    ) -> Result<usize> {
        let exceeded = || NetError::MaxDepthExceeded {
            id: self.nodes[idx].id,
            limit,
        };
        if d > limit {
            return Err(exceeded());
        }
        if let Some(known) = longest[idx] {
            return if d + known > limit {
                Err(exceeded())
            } else {
                Ok(known)
            };
        }
        let node = &self.nodes[idx];
        if node.is_sensor() {
            longest[idx] = Some(0);
            return Ok(0);
        }

        on_path[idx] = true;
        let mut max = 0;
        for &li in &node.incoming {
            let source = self.links[li].source;
            if on_path[source] {
                continue;
            }
            match self.depth(source, d + 1, limit, on_path, longest) {
                Ok(depth) => max = max.max(depth + 1),
                Err(e) => {
                    on_path[idx] = false;
                    return Err(e);
                }
            }
        }
        on_path[idx] = false;
        longest[idx] = Some(max);
        Ok(max)
    }
}
