use crate::nn::GraphError;
use crate::nn::nodes::raw_node::{TraitNode, invalid_parent_index, ops_shape_of_two};
use crate::tensor::Tensor;

/// 逐元素乘法节点（Hadamard积）
///
/// forward: a ⊙ b
/// backward: 对a的梯度为 upstream ⊙ b，对b的梯度为 upstream ⊙ a
pub(in crate::nn) struct Multiply {
    shape: Vec<usize>,
}

impl Multiply {
    pub(in crate::nn) fn new(parent_shapes: &[&[usize]]) -> Result<Self, GraphError> {
        Ok(Self {
            shape: ops_shape_of_two("Multiply", parent_shapes)?,
        })
    }
}

impl TraitNode for Multiply {
    fn type_name(&self) -> &'static str {
        "multiply"
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        Ok(parents[0] * parents[1])
    }

    fn calc_grad_to_parent(
        &self,
        parent_index: usize,
        parents: &[&Tensor],
        _value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        match parent_index {
            0 => Ok(upstream_grad * parents[1]),
            1 => Ok(upstream_grad * parents[0]),
            _ => Err(invalid_parent_index("Multiply", parent_index)),
        }
    }
}
