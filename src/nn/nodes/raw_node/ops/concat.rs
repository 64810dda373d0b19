use crate::nn::GraphError;
use crate::nn::nodes::raw_node::{TraitNode, invalid_parent_index};
use crate::tensor::Tensor;

/// 拼接节点：沿`axis`拼接任意多个父节点，除`axis`外其余维度须一致
///
/// backward: 按各父节点在`axis`上所占的区间，从上游梯度中截取对应部分
pub(in crate::nn) struct Concat {
    axis: usize,
    /// 每个父节点在`axis`上的起点和长度
    segments: Vec<(usize, usize)>,
    shape: Vec<usize>,
}

impl Concat {
    pub(in crate::nn) fn new(parent_shapes: &[&[usize]], axis: usize) -> Result<Self, GraphError> {
        let first = parent_shapes.first().ok_or_else(|| {
            GraphError::InvalidOperation("Concat节点至少需要1个父节点".to_string())
        })?;
        if axis >= first.len() {
            return Err(GraphError::InvalidOperation(format!(
                "Concat节点的拼接维度{axis}超出父节点的阶数{}",
                first.len()
            )));
        }

        let mut segments = Vec::with_capacity(parent_shapes.len());
        let mut offset = 0;
        for shape in parent_shapes {
            let consistent = shape.len() == first.len()
                && shape
                    .iter()
                    .zip(first.iter())
                    .enumerate()
                    .all(|(i, (a, b))| i == axis || a == b);
            if !consistent {
                return Err(GraphError::ShapeMismatch {
                    expected: first.to_vec(),
                    got: shape.to_vec(),
                    message: format!("Concat节点的父节点除第{axis}维外形状须一致"),
                });
            }
            segments.push((offset, shape[axis]));
            offset += shape[axis];
        }

        let mut shape = first.to_vec();
        shape[axis] = offset;
        Ok(Self {
            axis,
            segments,
            shape,
        })
    }
}

impl TraitNode for Concat {
    fn type_name(&self) -> &'static str {
        "concat"
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        Ok(Tensor::concat(parents, self.axis))
    }

    fn calc_grad_to_parent(
        &self,
        parent_index: usize,
        _parents: &[&Tensor],
        _value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        let &(start, len) = self
            .segments
            .get(parent_index)
            .ok_or_else(|| invalid_parent_index("Concat", parent_index))?;
        Ok(upstream_grad.narrow(self.axis, start, len))
    }
}
