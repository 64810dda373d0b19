/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : GraphInner VJP 反向传播
 */

use super::super::error::GraphError;
use super::GraphInner;
use crate::nn::NodeId;
use crate::nn::nodes::TraitNode;
use crate::tensor::Tensor;
use tracing::warn;

impl GraphInner {
    /// 反向传播：先确保损失节点已前向计算，再按逆拓扑序把梯度传给所有上游参数
    ///
    /// 返回损失值。参数梯度在多次调用间累加，需配合`zero_grad`使用。
    pub fn backward(&mut self, loss: NodeId) -> Result<f32, GraphError> {
        if !self.is_train_mode() {
            warn!(graph = %self.name, "在 no_grad/eval 模式下调用 backward，这通常是误用");
        }

        self.forward(loss)?;
        let loss_node = self.get_node(loss)?;
        let loss_value = loss_node.value().ok_or_else(|| {
            GraphError::ComputationError(format!("损失{loss_node}没有值，请先执行 forward"))
        })?;
        if loss_value.size() != 1 {
            return Err(GraphError::InvalidOperation(format!(
                "反向传播的起点必须是标量，{loss_node}的形状为{:?}",
                loss_value.shape()
            )));
        }
        let loss_scalar = loss_value.get_data_number().ok_or_else(|| {
            GraphError::ComputationError(format!(
                "无法从损失节点获取标量值，形状: {:?}",
                loss_value.shape()
            ))
        })?;
        let seed_grad = Tensor::ones(loss_value.shape());

        self.reset_intermediate_grad();
        self.get_node_mut(loss)?.set_grad(Some(&seed_grad))?;

        let order = self.topological_order(loss)?;
        for &id in order.iter().rev() {
            self.propagate_grad_to_parents(id)?;
        }
        Ok(loss_scalar)
    }

    /// 把节点`id`的梯度按 VJP 传给其父节点（输入节点不接收梯度）
    fn propagate_grad_to_parents(&mut self, id: NodeId) -> Result<(), GraphError> {
        let node = self.get_node(id)?;
        if node.is_leaf() {
            return Ok(());
        }
        let Some(upstream_grad) = node.grad() else {
            return Ok(());
        };
        let value = node.value().ok_or_else(|| {
            GraphError::ComputationError(format!("{node}在反向传播时没有值"))
        })?;

        let parent_ids = self.backward_edges.get(&id).cloned().unwrap_or_default();
        let mut parent_grads = Vec::with_capacity(parent_ids.len());
        {
            let mut parent_values = Vec::with_capacity(parent_ids.len());
            for parent_id in &parent_ids {
                let parent = self.get_node(*parent_id)?;
                parent_values.push(parent.value().ok_or_else(|| {
                    GraphError::ComputationError(format!("{node}的父节点{parent}没有值"))
                })?);
            }
            for (index, parent_id) in parent_ids.iter().enumerate() {
                if self.get_node(*parent_id)?.is_input() {
                    continue;
                }
                let grad = node.node_type().calc_grad_to_parent(
                    index,
                    &parent_values,
                    value,
                    upstream_grad,
                )?;
                parent_grads.push((*parent_id, grad));
            }
        }

        for (parent_id, grad) in parent_grads {
            self.get_node_mut(parent_id)?.accumulate_grad(grad)?;
        }
        Ok(())
    }

    /// 清除所有非参数节点的梯度
    pub(in crate::nn::graph) fn reset_intermediate_grad(&mut self) {
        for node in self.nodes.values_mut() {
            if !node.is_parameter() {
                node.clear_grad();
            }
        }
    }

    /// 清除所有节点（含参数）的梯度
    pub fn zero_grad(&mut self) {
        for node in self.nodes.values_mut() {
            node.clear_grad();
        }
    }
}
