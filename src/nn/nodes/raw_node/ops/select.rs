use crate::nn::GraphError;
use crate::nn::nodes::raw_node::{TraitNode, check_parents_count, invalid_parent_index};
use crate::tensor::Tensor;

/// 选取节点：取`axis`上第`index`个切片，输出比父节点少一维
///
/// 常用于从`[seq_len, batch, ...]`的序列中取出某一时间步
pub(in crate::nn) struct Select {
    axis: usize,
    index: usize,
    parent_shape: Vec<usize>,
    shape: Vec<usize>,
}

impl Select {
    pub(in crate::nn) fn new(parent_shapes: &[&[usize]], axis: usize, index: usize) -> Result<Self, GraphError> {
        check_parents_count("Select", parent_shapes, 1)?;
        let parent_shape = parent_shapes[0];
        if parent_shape.len() < 2 || axis >= parent_shape.len() || index >= parent_shape[axis] {
            return Err(GraphError::InvalidOperation(format!(
                "Select节点无法在形状为{parent_shape:?}的父节点第{axis}维上选取第{index}个切片"
            )));
        }
        let mut shape = parent_shape.to_vec();
        shape.remove(axis);
        Ok(Self {
            axis,
            index,
            parent_shape: parent_shape.to_vec(),
            shape,
        })
    }
}

impl TraitNode for Select {
    fn type_name(&self) -> &'static str {
        "select"
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        Ok(parents[0].select(self.axis, self.index))
    }

    fn calc_grad_to_parent(
        &self,
        parent_index: usize,
        _parents: &[&Tensor],
        _value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        if parent_index != 0 {
            return Err(invalid_parent_index("Select", parent_index));
        }
        Ok(Tensor::embed_select(
            &self.parent_shape,
            self.axis,
            self.index,
            upstream_grad,
        ))
    }
}
