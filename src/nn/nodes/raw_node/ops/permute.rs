use crate::nn::GraphError;
use crate::nn::nodes::raw_node::{TraitNode, check_parents_count, invalid_parent_index};
use crate::tensor::Tensor;

/// 维度重排节点：输出第i维是父节点的第`axes[i]`维
///
/// backward: 用逆排列把上游梯度换回父节点的维度顺序
pub(in crate::nn) struct Permute {
    axes: Vec<usize>,
    inverse_axes: Vec<usize>,
    shape: Vec<usize>,
}

impl Permute {
    pub(in crate::nn) fn new(parent_shapes: &[&[usize]], axes: &[usize]) -> Result<Self, GraphError> {
        check_parents_count("Permute", parent_shapes, 1)?;
        let parent_shape = parent_shapes[0];
        let dims = parent_shape.len();

        let mut inverse_axes = vec![usize::MAX; dims];
        if axes.len() != dims || dims < 2 {
            return Err(GraphError::InvalidOperation(format!(
                "Permute节点的维度序列{axes:?}与父节点的阶数{dims}不符（至少为2阶）"
            )));
        }
        for (i, &axis) in axes.iter().enumerate() {
            if axis >= dims || inverse_axes[axis] != usize::MAX {
                return Err(GraphError::InvalidOperation(format!(
                    "Permute节点的维度序列{axes:?}须是[0, {dims})的一个排列"
                )));
            }
            inverse_axes[axis] = i;
        }

        Ok(Self {
            axes: axes.to_vec(),
            inverse_axes,
            shape: axes.iter().map(|&a| parent_shape[a]).collect(),
        })
    }
}

impl TraitNode for Permute {
    fn type_name(&self) -> &'static str {
        "permute"
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        Ok(parents[0].permute(&self.axes))
    }

    fn calc_grad_to_parent(
        &self,
        parent_index: usize,
        _parents: &[&Tensor],
        _value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        if parent_index != 0 {
            return Err(invalid_parent_index("Permute", parent_index));
        }
        Ok(upstream_grad.permute(&self.inverse_axes))
    }
}
