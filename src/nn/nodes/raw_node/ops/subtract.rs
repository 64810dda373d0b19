use crate::nn::GraphError;
use crate::nn::nodes::raw_node::{TraitNode, invalid_parent_index, ops_shape_of_two};
use crate::tensor::Tensor;

/// 逐元素减法节点
///
/// forward: a - b
/// backward: 对a的梯度为上游梯度，对b的梯度为上游梯度取负
pub(in crate::nn) struct Subtract {
    shape: Vec<usize>,
}

impl Subtract {
    pub(in crate::nn) fn new(parent_shapes: &[&[usize]]) -> Result<Self, GraphError> {
        Ok(Self {
            shape: ops_shape_of_two("Subtract", parent_shapes)?,
        })
    }
}

impl TraitNode for Subtract {
    fn type_name(&self) -> &'static str {
        "subtract"
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        Ok(parents[0] - parents[1])
    }

    fn calc_grad_to_parent(
        &self,
        parent_index: usize,
        _parents: &[&Tensor],
        _value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        match parent_index {
            0 => Ok(upstream_grad.clone()),
            1 => Ok(-upstream_grad),
            _ => Err(invalid_parent_index("Subtract", parent_index)),
        }
    }
}
