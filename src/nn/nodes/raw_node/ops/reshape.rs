use crate::nn::GraphError;
use crate::nn::nodes::raw_node::{TraitNode, check_parents_count, invalid_parent_index};
use crate::tensor::Tensor;

/// 变形节点：元素个数不变，按行优先顺序重新排布
///
/// backward: 把上游梯度变回父节点的形状
pub(in crate::nn) struct Reshape {
    parent_shape: Vec<usize>,
    shape: Vec<usize>,
}

impl Reshape {
    pub(in crate::nn) fn new(parent_shapes: &[&[usize]], target_shape: &[usize]) -> Result<Self, GraphError> {
        check_parents_count("Reshape", parent_shapes, 1)?;
        let from_size: usize = parent_shapes[0].iter().product();
        let to_size: usize = target_shape.iter().product();
        if from_size != to_size || target_shape.is_empty() {
            return Err(GraphError::ShapeMismatch {
                expected: parent_shapes[0].to_vec(),
                got: target_shape.to_vec(),
                message: format!(
                    "Reshape节点的目标形状须与原形状元素个数一致（{from_size} vs {to_size}）"
                ),
            });
        }
        Ok(Self {
            parent_shape: parent_shapes[0].to_vec(),
            shape: target_shape.to_vec(),
        })
    }
}

impl TraitNode for Reshape {
    fn type_name(&self) -> &'static str {
        "reshape"
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        Ok(parents[0].reshape(&self.shape))
    }

    fn calc_grad_to_parent(
        &self,
        parent_index: usize,
        _parents: &[&Tensor],
        _value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        if parent_index != 0 {
            return Err(invalid_parent_index("Reshape", parent_index));
        }
        Ok(upstream_grad.reshape(&self.parent_shape))
    }
}
