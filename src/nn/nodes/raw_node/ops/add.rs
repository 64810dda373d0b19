use crate::nn::GraphError;
use crate::nn::nodes::raw_node::{TraitNode, invalid_parent_index, ops_shape_of_two};
use crate::tensor::Tensor;

/// 逐元素加法节点
///
/// forward: a + b
/// backward: 对两个父节点的梯度都等于上游梯度
pub(in crate::nn) struct Add {
    shape: Vec<usize>,
}

impl Add {
    pub(in crate::nn) fn new(parent_shapes: &[&[usize]]) -> Result<Self, GraphError> {
        Ok(Self {
            shape: ops_shape_of_two("Add", parent_shapes)?,
        })
    }
}

impl TraitNode for Add {
    fn type_name(&self) -> &'static str {
        "add"
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        Ok(parents[0] + parents[1])
    }

    fn calc_grad_to_parent(
        &self,
        parent_index: usize,
        _parents: &[&Tensor],
        _value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        match parent_index {
            0 | 1 => Ok(upstream_grad.clone()),
            _ => Err(invalid_parent_index("Add", parent_index)),
        }
    }
}
