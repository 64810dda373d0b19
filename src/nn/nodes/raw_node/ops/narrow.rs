use crate::nn::GraphError;
use crate::nn::nodes::raw_node::{TraitNode, check_parents_count, invalid_parent_index};
use crate::tensor::Tensor;

/// 截取节点：沿`axis`截取`[start, start + len)`，维数不变
///
/// backward: 上游梯度写回对应区间，其余位置为0
pub(in crate::nn) struct Narrow {
    axis: usize,
    start: usize,
    len: usize,
    parent_shape: Vec<usize>,
    shape: Vec<usize>,
}

impl Narrow {
    pub(in crate::nn) fn new(
        parent_shapes: &[&[usize]],
        axis: usize,
        start: usize,
        len: usize,
    ) -> Result<Self, GraphError> {
        check_parents_count("Narrow", parent_shapes, 1)?;
        let parent_shape = parent_shapes[0];
        if axis >= parent_shape.len() || len == 0 || start + len > parent_shape[axis] {
            return Err(GraphError::InvalidOperation(format!(
                "Narrow节点无法在形状为{parent_shape:?}的父节点第{axis}维上截取[{start}, {})",
                start + len
            )));
        }
        let mut shape = parent_shape.to_vec();
        shape[axis] = len;
        Ok(Self {
            axis,
            start,
            len,
            parent_shape: parent_shape.to_vec(),
            shape,
        })
    }
}

impl TraitNode for Narrow {
    fn type_name(&self) -> &'static str {
        "narrow"
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        Ok(parents[0].narrow(self.axis, self.start, self.len))
    }

    fn calc_grad_to_parent(
        &self,
        parent_index: usize,
        _parents: &[&Tensor],
        _value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        if parent_index != 0 {
            return Err(invalid_parent_index("Narrow", parent_index));
        }
        Ok(Tensor::embed_narrow(
            &self.parent_shape,
            self.axis,
            self.start,
            upstream_grad,
        ))
    }
}
