use super::raw_node::{InputKind, NodeType, TraitNode};
use crate::nn::GraphError;
use crate::tensor::Tensor;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 节点 ID（图内唯一，第一个节点 ID 是 1）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

/// 图中的节点容器
///
/// 负责保存节点的公共状态（名称、期望形状、值、梯度），
/// 具体的前向/反向计算委托给 `raw_node`。
pub(in crate::nn) struct NodeHandle {
    id: NodeId,
    name: String,
    raw_node: NodeType,
    value: Option<Tensor>,
    grad: Option<Tensor>,
}

impl NodeHandle {
    pub(in crate::nn) fn new<T: Into<NodeType>>(id: NodeId, name: &str, raw_node: T) -> Self {
        Self {
            id,
            name: name.to_string(),
            raw_node: raw_node.into(),
            value: None,
            grad: None,
        }
    }

    pub(in crate::nn) const fn id(&self) -> NodeId {
        self.id
    }

    pub(in crate::nn) fn name(&self) -> &str {
        &self.name
    }

    pub(in crate::nn) const fn node_type(&self) -> &NodeType {
        &self.raw_node
    }

    /// 节点创建时推断出的输出形状
    pub(in crate::nn) fn value_expected_shape(&self) -> &[usize] {
        self.raw_node.value_expected_shape()
    }

    pub(in crate::nn) const fn value(&self) -> Option<&Tensor> {
        self.value.as_ref()
    }

    pub(in crate::nn) const fn has_value(&self) -> bool {
        self.value.is_some()
    }

    pub(in crate::nn) const fn grad(&self) -> Option<&Tensor> {
        self.grad.as_ref()
    }

    /// 是否为叶子节点（输入或参数），叶子节点的值只能手动设置
    pub(in crate::nn) const fn is_leaf(&self) -> bool {
        matches!(self.raw_node, NodeType::Input(_) | NodeType::Parameter(_))
    }

    pub(in crate::nn) const fn is_parameter(&self) -> bool {
        matches!(self.raw_node, NodeType::Parameter(_))
    }

    pub(in crate::nn) fn is_input(&self) -> bool {
        matches!(self.raw_node, NodeType::Input(_))
    }

    /// 是否在每次前向传播结束后可被释放（参数和常量以外的所有节点）
    pub(in crate::nn) fn is_transient(&self) -> bool {
        match &self.raw_node {
            NodeType::Parameter(_) => false,
            NodeType::Input(input) => input.kind() != InputKind::Constant,
            _ => true,
        }
    }

    /// 手动设置叶子节点的值（形状必须与节点创建时一致）
    pub(in crate::nn) fn set_value(&mut self, value: Option<&Tensor>) -> Result<(), GraphError> {
        if !self.is_leaf() {
            return Err(GraphError::InvalidOperation(format!(
                "{self}的值由父节点计算得出，不应该被手动设置"
            )));
        }
        if let Some(v) = value {
            if v.shape() != self.value_expected_shape() {
                return Err(GraphError::ShapeMismatch {
                    expected: self.value_expected_shape().to_vec(),
                    got: v.shape().to_vec(),
                    message: format!("{self}的新值形状与创建时不一致"),
                });
            }
        }
        self.value = value.cloned();
        Ok(())
    }

    /// 写入前向计算的结果（仅供图内部使用）
    pub(in crate::nn) fn set_computed_value(&mut self, value: Tensor) {
        self.value = Some(value);
    }

    pub(in crate::nn) fn clear_value(&mut self) {
        self.value = None;
    }

    pub(in crate::nn) fn set_grad(&mut self, grad: Option<&Tensor>) -> Result<(), GraphError> {
        if let Some(g) = grad {
            if g.shape() != self.value_expected_shape() {
                return Err(GraphError::ShapeMismatch {
                    expected: self.value_expected_shape().to_vec(),
                    got: g.shape().to_vec(),
                    message: format!("{self}的梯度形状必须与其值一致"),
                });
            }
        }
        self.grad = grad.cloned();
        Ok(())
    }

    /// 累加梯度（同一节点被多个子节点使用时）
    pub(in crate::nn) fn accumulate_grad(&mut self, grad: Tensor) -> Result<(), GraphError> {
        let new_grad = match self.grad.take() {
            Some(existing) => existing + &grad,
            None => grad,
        };
        self.set_grad(Some(&new_grad))
    }

    pub(in crate::nn) fn clear_grad(&mut self) {
        self.grad = None;
    }
}

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "节点[id={}, name={}, type={}]",
            self.id.0,
            self.name,
            self.raw_node.type_name()
        )
    }
}
