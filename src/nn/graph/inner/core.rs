/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : GraphInner 基础操作 + forward
 */

use super::super::error::GraphError;
use super::GraphInner;
use crate::nn::NodeId;
use crate::nn::nodes::{NodeHandle, TraitNode};
use crate::tensor::Tensor;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::{HashMap, HashSet};
use tracing::trace;

impl GraphInner {
    pub fn new() -> Self {
        Self::with_name("default_graph")
    }

    pub fn new_with_seed(seed: u64) -> Self {
        let mut graph = Self::new();
        graph.set_seed(seed);
        graph
    }

    pub fn with_name(name: &str) -> Self {
        Self {
            name: name.to_string(),
            nodes: HashMap::new(),
            forward_edges: HashMap::new(),
            backward_edges: HashMap::new(),
            next_id: 0,
            is_eval_mode: false,
            rng: None,
        }
    }

    /// 设置图级别的随机种子（影响之后所有参数的初始化）
    pub fn set_seed(&mut self, seed: u64) {
        self.rng = Some(StdRng::seed_from_u64(seed));
    }

    pub const fn has_seed(&self) -> bool {
        self.rng.is_some()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nodes(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.nodes.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn nodes_count(&self) -> usize {
        self.nodes.len()
    }

    pub(in crate::nn) fn get_node(&self, id: NodeId) -> Result<&NodeHandle, GraphError> {
        self.nodes.get(&id).ok_or(GraphError::NodeNotFound(id))
    }

    pub(in crate::nn) fn get_node_mut(&mut self, id: NodeId) -> Result<&mut NodeHandle, GraphError> {
        self.nodes.get_mut(&id).ok_or(GraphError::NodeNotFound(id))
    }

    pub fn get_node_parents(&self, id: NodeId) -> Result<Vec<NodeId>, GraphError> {
        self.get_node(id)?;
        Ok(self.backward_edges.get(&id).cloned().unwrap_or_default())
    }

    pub fn get_node_children(&self, id: NodeId) -> Result<Vec<NodeId>, GraphError> {
        self.get_node(id)?;
        Ok(self.forward_edges.get(&id).cloned().unwrap_or_default())
    }

    pub fn get_node_name(&self, id: NodeId) -> Result<&str, GraphError> {
        Ok(self.get_node(id)?.name())
    }

    pub fn get_node_value_expected_shape(&self, id: NodeId) -> Result<&[usize], GraphError> {
        Ok(self.get_node(id)?.value_expected_shape())
    }

    pub fn get_node_value(&self, id: NodeId) -> Result<Option<&Tensor>, GraphError> {
        Ok(self.get_node(id)?.value())
    }

    /// 设置叶子节点（输入或参数）的值，并使其所有下游节点的缓存值失效
    pub fn set_node_value(&mut self, id: NodeId, value: Option<&Tensor>) -> Result<(), GraphError> {
        self.get_node_mut(id)?.set_value(value)?;
        self.invalidate_descendants(id);
        Ok(())
    }

    /// 获取节点的梯度（输入节点没有梯度，调用即报错）
    pub fn get_node_grad(&self, id: NodeId) -> Result<Option<Tensor>, GraphError> {
        let node = self.get_node(id)?;
        if node.is_input() {
            return Err(GraphError::InvalidOperation(format!("输入{node}不应该有梯度")));
        }
        Ok(node.grad().cloned())
    }

    /// 直接设置节点梯度（梯度裁剪等场景使用）
    pub fn set_node_grad(&mut self, id: NodeId, grad: Option<&Tensor>) -> Result<(), GraphError> {
        self.get_node_mut(id)?.set_grad(grad)
    }

    /// 按 ID 升序返回所有参数节点
    pub fn get_trainable_nodes(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|(_, node)| node.is_parameter())
            .map(|(&id, _)| id)
            .collect();
        ids.sort_unstable();
        ids
    }

    pub(in crate::nn::graph) fn generate_valid_node_id(&mut self) -> NodeId {
        self.next_id += 1;
        NodeId(self.next_id)
    }

    pub(in crate::nn::graph) fn check_duplicate_node_name(&self, name: &str) -> Result<(), GraphError> {
        if self.nodes.values().any(|node| node.name() == name) {
            return Err(GraphError::DuplicateNodeName(format!(
                "节点{}在图{}中重复",
                name,
                self.name()
            )));
        }
        Ok(())
    }

    pub(in crate::nn) fn rng_mut(&mut self) -> Option<&mut StdRng> {
        self.rng.as_mut()
    }

    /// 返回以`root`为终点的子图的拓扑序（父节点总在子节点之前）
    pub(in crate::nn::graph) fn topological_order(&self, root: NodeId) -> Result<Vec<NodeId>, GraphError> {
        self.get_node(root)?;
        let mut order = Vec::new();
        let mut visited = HashSet::new();
        // (节点, 其父节点是否已入栈)
        let mut stack = vec![(root, false)];
        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                order.push(id);
                continue;
            }
            if !visited.insert(id) {
                continue;
            }
            stack.push((id, true));
            if let Some(parents) = self.backward_edges.get(&id) {
                for &parent in parents.iter().rev() {
                    if !visited.contains(&parent) {
                        stack.push((parent, false));
                    }
                }
            }
        }
        Ok(order)
    }

    // ========== forward ==========

    /// 计算节点的值：按拓扑序计算其所有尚无值的上游节点
    pub fn forward(&mut self, node_id: NodeId) -> Result<(), GraphError> {
        let order = self.topological_order(node_id)?;
        let mut computed = 0usize;
        for id in order {
            let node = self.get_node(id)?;
            if node.has_value() {
                continue;
            }
            if node.is_leaf() {
                return Err(GraphError::InvalidOperation(format!(
                    "{node}不能直接前向传播（须手动设置值）"
                )));
            }

            let value = {
                let parent_ids = self.backward_edges.get(&id).map_or(&[][..], Vec::as_slice);
                let mut parent_values = Vec::with_capacity(parent_ids.len());
                for parent_id in parent_ids {
                    let parent = self.get_node(*parent_id)?;
                    parent_values.push(parent.value().ok_or_else(|| {
                        GraphError::ComputationError(format!(
                            "{node}的父节点{parent}没有值。不该触及本错误，否则说明crate代码有问题"
                        ))
                    })?);
                }
                node.node_type().calc_value_by_parents(&parent_values)?
            };
            self.get_node_mut(id)?.set_computed_value(value);
            computed += 1;
        }
        trace!(graph = %self.name, node = node_id.0, computed, "前向传播完成");
        Ok(())
    }

    /// 清除`node_id`所有下游节点的缓存值
    fn invalidate_descendants(&mut self, node_id: NodeId) {
        let mut stack = self.forward_edges.get(&node_id).cloned().unwrap_or_default();
        let mut visited = HashSet::new();
        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            if let Some(node) = self.nodes.get_mut(&id) {
                if !node.has_value() {
                    continue;
                }
                node.clear_value();
            }
            if let Some(children) = self.forward_edges.get(&id) {
                stack.extend(children.iter().copied());
            }
        }
    }

    /// 释放所有临时节点（参数和常量以外的节点），返回被释放的节点数
    ///
    /// 被释放节点对应的`Var`随之失效，再使用会得到`NodeNotFound`错误。
    pub fn release_transient_nodes(&mut self) -> usize {
        let released: HashSet<NodeId> = self
            .nodes
            .iter()
            .filter(|(_, node)| node.is_transient())
            .map(|(&id, _)| id)
            .collect();
        if released.is_empty() {
            return 0;
        }

        self.nodes.retain(|id, _| !released.contains(id));
        self.backward_edges.retain(|id, _| !released.contains(id));
        self.forward_edges.retain(|id, _| !released.contains(id));
        for children in self.forward_edges.values_mut() {
            children.retain(|id| !released.contains(id));
        }
        trace!(graph = %self.name, released = released.len(), "释放临时节点");
        released.len()
    }
}
