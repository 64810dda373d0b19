use crate::nn::GraphError;
use crate::nn::nodes::raw_node::{TraitNode, check_parents_count, invalid_parent_index};
use crate::tensor::Tensor;

/// 矩阵乘法节点
///
/// forward: C = A @ B，`[m, n] @ [n, p] = [m, p]`
/// backward（VJP）: dL/dA = G @ Bᵀ，dL/dB = Aᵀ @ G
pub(in crate::nn) struct MatMul {
    shape: Vec<usize>,
}

impl MatMul {
    pub(in crate::nn) fn new(parent_shapes: &[&[usize]]) -> Result<Self, GraphError> {
        // 1. 必要的验证
        check_parents_count("MatMul", parent_shapes, 2)?;
        let (a, b) = (parent_shapes[0], parent_shapes[1]);
        if a.len() != 2 || b.len() != 2 {
            return Err(GraphError::InvalidOperation(format!(
                "MatMul节点的父节点必须都是2阶张量，实际形状为{a:?}和{b:?}"
            )));
        }
        if a[1] != b[0] {
            return Err(GraphError::ShapeMismatch {
                expected: vec![a[1], b[1]],
                got: b.to_vec(),
                message: format!("MatMul节点的左矩阵列数须等于右矩阵行数（左矩阵形状为{a:?}）"),
            });
        }

        // 2. 返回
        Ok(Self {
            shape: vec![a[0], b[1]],
        })
    }
}

impl TraitNode for MatMul {
    fn type_name(&self) -> &'static str {
        "mat_mul"
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        Ok(parents[0].mat_mul(parents[1]))
    }

    fn calc_grad_to_parent(
        &self,
        parent_index: usize,
        parents: &[&Tensor],
        _value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        match parent_index {
            0 => Ok(upstream_grad.mat_mul(&parents[1].transpose())),
            1 => Ok(parents[0].transpose().mat_mul(upstream_grad)),
            _ => Err(invalid_parent_index("MatMul", parent_index)),
        }
    }
}
