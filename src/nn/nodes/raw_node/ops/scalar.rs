use crate::nn::GraphError;
use crate::nn::nodes::raw_node::{TraitNode, check_parents_count, invalid_parent_index};
use crate::tensor::Tensor;

/// 乘以常数的节点：forward `c * x`，backward `c * upstream`
pub(in crate::nn) struct ScalarMultiply {
    scalar: f32,
    shape: Vec<usize>,
}

impl ScalarMultiply {
    pub(in crate::nn) fn new(parent_shapes: &[&[usize]], scalar: f32) -> Result<Self, GraphError> {
        check_parents_count("ScalarMultiply", parent_shapes, 1)?;
        Ok(Self {
            scalar,
            shape: parent_shapes[0].to_vec(),
        })
    }
}

impl TraitNode for ScalarMultiply {
    fn type_name(&self) -> &'static str {
        "scalar_multiply"
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        Ok(parents[0] * self.scalar)
    }

    fn calc_grad_to_parent(
        &self,
        parent_index: usize,
        _parents: &[&Tensor],
        _value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        if parent_index != 0 {
            return Err(invalid_parent_index("ScalarMultiply", parent_index));
        }
        Ok(upstream_grad * self.scalar)
    }
}

/// 加上常数的节点：forward `x + c`，backward 直接传递上游梯度
pub(in crate::nn) struct ScalarAdd {
    scalar: f32,
    shape: Vec<usize>,
}

impl ScalarAdd {
    pub(in crate::nn) fn new(parent_shapes: &[&[usize]], scalar: f32) -> Result<Self, GraphError> {
        check_parents_count("ScalarAdd", parent_shapes, 1)?;
        Ok(Self {
            scalar,
            shape: parent_shapes[0].to_vec(),
        })
    }
}

impl TraitNode for ScalarAdd {
    fn type_name(&self) -> &'static str {
        "scalar_add"
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        Ok(parents[0] + self.scalar)
    }

    fn calc_grad_to_parent(
        &self,
        parent_index: usize,
        _parents: &[&Tensor],
        _value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        if parent_index != 0 {
            return Err(invalid_parent_index("ScalarAdd", parent_index));
        }
        Ok(upstream_grad.clone())
    }
}
